use catppuccin::{Colour, Flavour};
use chess_session::{worker::SearchWorker, Side, TurnController, TurnState};
use sdl2::{
    event::{Event, WindowEvent},
    image::InitFlag,
    keyboard::Keycode,
    mouse::MouseButton,
    render::Canvas,
    video::Window,
    EventPump,
};
use tracing::{debug, info};

use crate::{
    config::Opts,
    render::{BoardRenderer, SideMenu, TextureStore},
};

/// how long one frame waits for input before the search worker is polled again
const FRAME_MS: u32 = 20;

pub trait Draw {
    /// Draws onto `canvas`, returns whether anything was drawn
    fn draw(&self, canvas: &mut Canvas<Window>) -> Result<bool, String>;
}

pub trait AsRgba {
    fn as_sdl(&self) -> sdl2::pixels::Color;
}

impl AsRgba for Colour {
    fn as_sdl(&self) -> sdl2::pixels::Color {
        let (r, g, b) = (*self).into();

        sdl2::pixels::Color {
            r,
            g,
            b,
            a: u8::MAX,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct StrError(String);

fn is_quit(event: &Event) -> bool {
    matches!(
        event,
        Event::Quit { .. }
            | Event::KeyDown {
                keycode: Some(Keycode::Escape),
                ..
            }
    )
}

/// Shows the side menu until a side is picked. `None` if the window was closed instead.
fn choose_side(
    canvas: &mut Canvas<Window>,
    event_pump: &mut EventPump,
    menu: &SideMenu,
) -> anyhow::Result<Option<Side>> {
    let id = canvas.window().id();
    menu.draw(canvas).map_err(StrError)?;
    canvas.present();

    loop {
        match event_pump.wait_event() {
            event if is_quit(&event) => return Ok(None),
            Event::MouseButtonDown {
                mouse_btn: MouseButton::Left,
                window_id,
                x,
                y,
                ..
            } if window_id == id => {
                if let Some(side) = menu.side_at(x, y) {
                    return Ok(Some(side));
                }
            }
            Event::Window {
                win_event: WindowEvent::Exposed,
                ..
            } => {
                menu.draw(canvas).map_err(StrError)?;
                canvas.present();
            }
            _ => {}
        }
    }
}

pub fn main(opts: &Opts) -> anyhow::Result<()> {
    let flavor = Flavour::Mocha;
    let geometry = opts.geometry();
    let rules = opts.rules()?;

    let sdl_context = sdl2::init().map_err(StrError)?;
    let video_subsystem = sdl_context.video().map_err(StrError)?;

    let _image_context = sdl2::image::init(InitFlag::PNG | InitFlag::JPG).map_err(StrError)?;

    let window = video_subsystem
        .window("chess", geometry.board_size(), geometry.board_size())
        .position_centered()
        .build()?;

    let id = window.id();

    let mut canvas = window.into_canvas().software().build()?;

    let texture_creator = canvas.texture_creator();

    let store = TextureStore::new(&texture_creator).map_err(StrError)?;

    canvas.set_draw_color(flavor.base().as_sdl());
    canvas.clear();

    let mut event_pump = sdl_context.event_pump().map_err(StrError)?;

    let side = match opts.side {
        Some(side) => side,
        None => match choose_side(&mut canvas, &mut event_pump, &SideMenu::new(&store, geometry))? {
            Some(side) => side,
            None => return Ok(()),
        },
    };

    let mut controller = TurnController::new(rules, opts.session(side)?);
    let engine = opts.engine()?;
    canvas
        .window_mut()
        .set_title(&format!("chess: {side} vs {}", engine.name()))?;
    let mut worker = SearchWorker::spawn(engine)?;

    let renderer = BoardRenderer::new(store, geometry);
    let mut announced = false;

    'running: loop {
        if let Some(event) = event_pump.wait_event_timeout(FRAME_MS) {
            match event {
                event if is_quit(&event) => break 'running,
                Event::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    window_id,
                    x,
                    y,
                    ..
                } if window_id == id => {
                    if let Some(square) = geometry.square_at(x, y, controller.orientation()) {
                        let click = controller.click(square);
                        debug!(%square, ?click, "click");
                        renderer.mark_dirty();
                    }
                }
                Event::Window {
                    win_event: WindowEvent::Exposed,
                    ..
                } => renderer.mark_dirty(),
                _ => {}
            }
        }

        if controller.poll_worker(&mut worker)?.is_some() {
            renderer.mark_dirty();
        }

        if controller.state() == TurnState::GameOver && !announced {
            announced = true;
            let status = controller.status();
            info!(result = status.result(), "{status}");
            canvas
                .window_mut()
                .set_title(&format!("{status} {}", status.result()))?;
        }

        if renderer.view(&controller).draw(&mut canvas).map_err(StrError)? {
            canvas.present();
        }
    }

    worker.cancel();
    Ok(())
}
