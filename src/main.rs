#![allow(dead_code)]

mod app;
mod builder;
mod camera;
mod config;
mod constants;
mod draw;
mod export;
mod geometry;
mod leaf;
mod renderer;
mod ui;

use builder::TreeBuilder;
use camera::Camera;
use config::DungeonConfig;
use constants::*;
use draw::{DrawEvent, DrawQueue};
use geometry::Rect;
use leaf::BspTree;
use renderer::Renderer;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use glutin::prelude::*;
use glutin::surface::WindowSurface;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use egui_glow::EguiGlow;

/// Generate a BSP dungeon layout and watch it being carved.
#[derive(Parser, Debug)]
#[command(name = "bsp-dungeon")]
#[command(about = "Generate dungeon layouts by binary space partitioning")]
struct Args {
    /// Dungeon width in cells
    #[arg(long, default_value_t = DEFAULT_DUNGEON_WIDTH)]
    width: i32,

    /// Dungeon height in cells
    #[arg(long, default_value_t = DEFAULT_DUNGEON_HEIGHT)]
    height: i32,

    /// Seed for the generator (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Smallest allowed piece of a split region
    #[arg(long, default_value_t = DEFAULT_MIN_LEAF_SIZE)]
    min_leaf: i32,

    /// Regions wider or taller than this always split
    #[arg(long, default_value_t = DEFAULT_MAX_LEAF_SIZE)]
    max_leaf: i32,

    /// Chance an eligible region keeps splitting
    #[arg(long, default_value_t = DEFAULT_SPLIT_CHANCE)]
    split_chance: f64,

    /// Write the layout to a PNG and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Pixels per cell in the exported image
    #[arg(long, default_value_t = EXPORT_DEFAULT_CELL_PX)]
    cell_px: u32,

    /// Generate without opening a window
    #[arg(long)]
    headless: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logging();

    let mut config = DungeonConfig::new(args.width, args.height);
    config.min_leaf_size = args.min_leaf;
    config.max_leaf_size = args.max_leaf;
    config.split_chance = args.split_chance;

    let builder = TreeBuilder::new(config)?;
    let seed = args.seed.unwrap_or_else(rand::random);

    if args.headless || args.export.is_some() {
        let (tree, events) = generate(&builder, seed);
        if let Some(path) = &args.export {
            export::export_png(path, &tree, &events, args.cell_px)?;
            info!(path = %path.display(), "wrote layout image");
        }
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(builder, seed);
    event_loop.run_app(&mut app)?;
    Ok(())
}

fn setup_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(env_filter))
        .init();
}

/// Run one generation pass with a fresh seeded RNG.
fn generate(builder: &TreeBuilder, seed: u64) -> (BspTree, Vec<DrawEvent>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut queue = DrawQueue::new();
    let tree = builder.build(&mut rng, &mut queue);
    let events: Vec<DrawEvent> = queue.drain().collect();

    info!(
        seed,
        nodes = tree.len(),
        rooms = tree.room_count(),
        events = events.len(),
        "dungeon generated"
    );

    (tree, events)
}

struct App {
    builder: TreeBuilder,
    seed: u64,
    state: Option<AppState>,
}

struct AppState {
    // Window and GL
    window: Window,
    gl_surface: glutin::surface::Surface<WindowSurface>,
    gl_context: glutin::context::PossiblyCurrentContext,
    gl: Arc<glow::Context>,
    egui_glow: EguiGlow,

    // Rendering
    camera: Camera,
    renderer: Renderer,

    // Generated layout
    builder: TreeBuilder,
    seed: u64,
    tree: BspTree,
    events: Vec<DrawEvent>,

    // Progressive reveal
    revealed: usize,
    reveal_timer: f32,
    show_outlines: bool,

    // Input state
    mouse_pos: (f32, f32),
    mouse_down: bool,

    // Timing
    last_frame_time: Instant,
}

impl App {
    fn new(builder: TreeBuilder, seed: u64) -> Self {
        Self {
            builder,
            seed,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        // Create window and GL context
        let app::WindowContext {
            window,
            gl_surface,
            gl_context,
            gl,
            egui_glow,
        } = app::create_window(event_loop);

        let size = window.inner_size();
        let mut camera = Camera::new(size.width as f32, size.height as f32);
        let renderer = Renderer::new(gl.clone()).expect("Failed to create renderer");

        let builder = self.builder.clone();
        let (tree, events) = generate(&builder, self.seed);

        let config = builder.config();
        camera.fit_to(config.width, config.height);

        self.state = Some(AppState {
            window,
            gl_surface,
            gl_context,
            gl,
            egui_glow,
            camera,
            renderer,
            builder,
            seed: self.seed,
            tree,
            events,
            revealed: 0,
            reveal_timer: 0.0,
            show_outlines: true,
            mouse_pos: (0.0, 0.0),
            mouse_down: false,
            last_frame_time: Instant::now(),
        });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let state = match &mut self.state {
            Some(s) => s,
            None => return,
        };

        // Let egui handle the event first
        let egui_consumed = state.egui_glow.on_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                app::resize_surface(&state.gl_surface, &state.gl_context, size.width, size.height);
                state.renderer.resize(size.width as i32, size.height as i32);
                state.camera.resize(size.width as f32, size.height as f32);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if !egui_consumed.consumed && event.state == ElementState::Pressed {
                    if let PhysicalKey::Code(key) = event.physical_key {
                        match key {
                            KeyCode::Escape => event_loop.exit(),
                            KeyCode::KeyR => state.regenerate(),
                            KeyCode::Space => state.reveal_all(),
                            _ => {}
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let pos = (position.x as f32, position.y as f32);
                if state.mouse_down && !egui_consumed.consumed {
                    let dx = pos.0 - state.mouse_pos.0;
                    let dy = pos.1 - state.mouse_pos.1;
                    state.camera.pan(dx, dy);
                }
                state.mouse_pos = pos;
            }
            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } => {
                if button == MouseButton::Left {
                    match btn_state {
                        ElementState::Pressed => {
                            if !egui_consumed.consumed {
                                state.mouse_down = true;
                            }
                        }
                        ElementState::Released => {
                            if state.mouse_down {
                                state.mouse_down = false;
                                state.camera.release_pan();
                            }
                        }
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if !egui_consumed.consumed {
                    let scroll = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y * 2.0,
                        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                    };
                    state
                        .camera
                        .add_zoom_impulse(scroll, state.mouse_pos.0, state.mouse_pos.1);
                }
            }
            WindowEvent::RedrawRequested => {
                state.update_and_render();
                state.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}

impl AppState {
    fn regenerate(&mut self) {
        self.seed = rand::random();
        let (tree, events) = generate(&self.builder, self.seed);
        self.tree = tree;
        self.events = events;
        self.revealed = 0;
        self.reveal_timer = 0.0;
    }

    fn reveal_all(&mut self) {
        self.revealed = self.events.len();
        self.reveal_timer = 0.0;
    }

    fn update_and_render(&mut self) {
        puffin::profile_function!();

        let current_time = Instant::now();
        let raw_dt = (current_time - self.last_frame_time).as_secs_f32();
        self.last_frame_time = current_time;

        // Cap dt so a stalled frame doesn't dump the whole reveal at once
        let dt = raw_dt.min(MAX_FRAME_DT);

        // Advance the progressive reveal
        self.reveal_timer += dt;
        while self.reveal_timer >= REVEAL_INTERVAL && self.revealed < self.events.len() {
            self.reveal_timer -= REVEAL_INTERVAL;
            self.revealed += 1;
        }
        if self.revealed >= self.events.len() {
            self.reveal_timer = 0.0;
        }

        // Update camera (pass mouse_down so momentum doesn't apply while dragging)
        self.camera.update(dt, self.mouse_down);

        // Run UI
        let data = ui::PanelData {
            seed: self.seed,
            config: self.builder.config(),
            node_count: self.tree.len(),
            room_count: self.tree.room_count(),
            event_count: self.events.len(),
            revealed: self.revealed,
        };
        let mut show_outlines = self.show_outlines;
        let mut actions = ui::UiActions::default();
        self.egui_glow.run(&self.window, |ctx| {
            actions = ui::draw_panel(ctx, &data, &mut show_outlines);
        });
        self.show_outlines = show_outlines;

        if actions.regenerate {
            self.regenerate();
        }
        if actions.reveal_all {
            self.reveal_all();
        }

        // Render
        unsafe {
            use glow::HasContext;
            self.gl
                .clear_color(COLOR_BACKGROUND.x, COLOR_BACKGROUND.y, COLOR_BACKGROUND.z, 1.0);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }
        {
            puffin::profile_scope!("render_cells");
            self.renderer
                .render_cells(&self.camera, &self.events[..self.revealed]);
        }
        if self.show_outlines {
            puffin::profile_scope!("render_outlines");
            let bounds: Vec<Rect> = self.tree.nodes().map(|node| node.bounds).collect();
            self.renderer
                .render_outlines(&self.camera, &bounds, COLOR_OUTLINE);
        }

        // Render egui
        self.egui_glow.paint(&self.window);

        // Swap buffers
        self.gl_surface.swap_buffers(&self.gl_context).unwrap();
    }
}
