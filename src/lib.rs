use speedy2d::dimen::Vector2;
use speedy2d::font::{Font, FormattedTextBlock, TextLayout, TextOptions};
use speedy2d::shape::Rectangle;
use speedy2d::window::{MouseButton, VirtualKeyCode, WindowHandler, WindowHelper};
use speedy2d::{Graphics2D, Window};
use std::path::Path;
use std::rc::Rc;

pub mod chaos;
pub mod config;
pub mod error;

pub use chaos::{Control, Input, Phase, Point, Simulation};
pub use config::{Config, Pacing};
pub use error::{Error, Result};

/// Reads and parses the label font. Called before any window exists so a
/// missing asset aborts startup.
pub fn load_font(path: &Path) -> Result<Font> {
    let bytes = std::fs::read(path).map_err(|source| Error::FontRead {
        path: path.to_path_buf(),
        source,
    })?;
    Font::new(&bytes).map_err(|err| Error::FontParse {
        path: path.to_path_buf(),
        reason: error::describe_chain(&err),
    })
}

/// Loads assets, opens the window and runs the frame loop. Only returns on a
/// startup failure; closing the window ends the process.
pub fn run(config: Config) -> Result<()> {
    let font = load_font(&config.font_path)?;
    log::info!("loaded font {}", config.font_path.display());

    let window = Window::new_centered(
        config.title.as_str(),
        (config.window_width, config.window_height),
    )
    .map_err(|err| Error::Window(error::describe_chain(&err)))?;

    let app = App::new(config, font);
    window.run_loop(app)
}

/// A left click at the last known cursor position, if there is one yet.
fn left_click(cursor: Option<Vector2<f32>>) -> Option<Input> {
    cursor.map(|pos| Input::LeftClick(Point::from(pos)))
}

pub struct App {
    config: Config,
    sim: Simulation,
    font: Font,
    label: Option<(Phase, Rc<FormattedTextBlock>)>,
    /// `None` until the first cursor move.
    last_mouse_pos: Option<Vector2<f32>>,
}

impl App {
    pub fn new(config: Config, font: Font) -> App {
        let sim = Simulation::new(&config);
        App {
            config,
            sim,
            font,
            label: None,
            last_mouse_pos: None,
        }
    }

    fn dispatch(&mut self, helper: &mut WindowHelper, input: Input) {
        if self.sim.handle(input) == Control::Exit {
            log::info!("exit requested");
            helper.terminate_loop();
        }
    }

    /// Re-lays out the label only when the phase has changed.
    fn label_for(&mut self, phase: Phase) -> Rc<FormattedTextBlock> {
        match &self.label {
            Some((cached, block)) if *cached == phase => block.clone(),
            _ => {
                let block = self.font.layout_text(
                    phase.instructions(),
                    self.config.font_size,
                    TextOptions::new(),
                );
                self.label = Some((phase, block.clone()));
                block
            }
        }
    }

    fn draw_point(&self, graphics: &mut Graphics2D, p: Point) {
        let size = self.config.point_size;
        graphics.draw_rectangle(
            Rectangle::new(Vector2::new(p.x, p.y), Vector2::new(p.x + size, p.y + size)),
            self.config.point_color,
        );
    }
}

impl WindowHandler for App {
    fn on_draw(&mut self, helper: &mut WindowHelper, graphics: &mut Graphics2D) {
        self.sim.update();
        let phase = self.sim.phase();

        graphics.clear_screen(self.config.background_color);

        for &v in self.sim.vertices() {
            graphics.draw_circle(v, self.config.vertex_radius, self.config.vertex_color);
        }

        if let Some(seed) = self.sim.seed_point() {
            self.draw_point(graphics, seed);
        }
        for &p in self.sim.points() {
            self.draw_point(graphics, p);
        }

        let label = self.label_for(phase);
        graphics.draw_text(self.config.label_position, self.config.label_color, &label);

        helper.request_redraw();
    }

    fn on_mouse_move(&mut self, _helper: &mut WindowHelper, position: Vector2<f32>) {
        self.last_mouse_pos = Some(position);
    }

    // button events carry no position, so use the last cursor move
    fn on_mouse_button_down(&mut self, helper: &mut WindowHelper, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }
        match left_click(self.last_mouse_pos) {
            Some(input) => self.dispatch(helper, input),
            None => log::debug!("ignoring click before the cursor position is known"),
        }
    }

    fn on_key_down(
        &mut self,
        helper: &mut WindowHelper,
        virtual_key_code: Option<VirtualKeyCode>,
        _scancode: u32,
    ) {
        if virtual_key_code == Some(VirtualKeyCode::Escape) {
            self.dispatch(helper, Input::Close);
        }
    }
}
