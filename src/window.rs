// ============================================================================
// WINDOW DRIVER
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, Event, MouseButton, StartCause, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::animation::{AnimationLoop, LoopState};
use crate::annotation::{PointerButton, PointerEvent, PointerHandler};
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::raster::{rasterize, Canvas, PanelRect, Projection};
use crate::surface::Scene;

#[derive(Debug, Clone)]
pub struct WindowOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        _ => PointerButton::Other,
    }
}

/// Opens a window with one panel per dial and lets the event loop pace the
/// animation: each cycle is followed by `WaitUntil(now + interval)`.
///
/// Returns once the animation stops or the window is closed.
pub fn run_window<C: Clock>(
    mut animation: AnimationLoop<C, Scene>,
    options: WindowOptions,
    font: Option<Font<'static>>,
) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(&options.title)
        .with_inner_size(LogicalSize::new(
            options.width as f64,
            options.height as f64,
        ))
        .build(&event_loop)?;

    let window = Arc::new(window);
    let window_clone = window.clone();
    let size = window.inner_size();
    let mut fb_width = size.width as usize;
    let mut fb_height = size.height as usize;
    let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
    let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

    let interval = animation.interval();
    let panel_count = animation.dials().len();
    let mut cursor: Option<PhysicalPosition<f64>> = None;
    let failure: Rc<Cell<Option<Error>>> = Rc::new(Cell::new(None));
    let failure_in_loop = failure.clone();

    event_loop.run(move |event, window_target| match event {
        Event::NewEvents(StartCause::Init) | Event::NewEvents(StartCause::ResumeTimeReached { .. }) => {
            match animation.step() {
                LoopState::Running => {
                    window_target.set_control_flow(ControlFlow::WaitUntil(Instant::now() + interval));
                    window_clone.request_redraw();
                }
                LoopState::Stopped => window_target.exit(),
            }
        }
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => {
                tracing::info!(cycles = animation.cycles(), "window closed");
                window_target.exit();
            }
            WindowEvent::Resized(new_size) => {
                fb_width = new_size.width as usize;
                fb_height = new_size.height as usize;
                let resized = pixels
                    .resize_buffer(new_size.width, new_size.height)
                    .and_then(|_| pixels.resize_surface(new_size.width, new_size.height));
                if let Err(err) = resized {
                    tracing::warn!(%err, "failed to resize frame buffer");
                }
                window_clone.request_redraw();
            }
            WindowEvent::CursorMoved { position, .. } => {
                cursor = Some(position);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => {
                let Some(position) = cursor else {
                    return;
                };
                let panels = PanelRect::columns(fb_width, fb_height, panel_count);
                let Some((index, rect)) = panels
                    .into_iter()
                    .enumerate()
                    .find(|(_, rect)| rect.contains(position.x, position.y))
                else {
                    return;
                };
                let scene = animation.dials()[index].surface();
                let projection = Projection::new(rect, scene.viewport(), scene.aspect());
                let event = PointerEvent {
                    position: projection.to_dial(position.x, position.y),
                    button: pointer_button(button),
                };
                if animation.on_pointer(index, event) {
                    window_clone.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                let panels = PanelRect::columns(fb_width, fb_height, panel_count);
                let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                for (dial, rect) in animation.dials().iter().zip(panels) {
                    rasterize(&mut canvas, rect, dial.surface(), font.as_ref());
                }
                if let Err(err) = pixels.render() {
                    tracing::error!(%err, "failed to present frame");
                    failure_in_loop.set(Some(err.into()));
                    window_target.exit();
                }
            }
            _ => {}
        },
        _ => {}
    })?;

    match failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
