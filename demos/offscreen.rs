// plywood-gl/demos/offscreen.rs
//
//! Renders a frame with Skia into a headless EGL context and writes it to a PNG file.

use clap::{App, Arg};
use euclid::default::Size2D;
use plywood_gl::gl_utils;
use plywood_gl::{gr_context, initialize_gl_state, query_framebuffer_info, reset_gr_context};
use plywood_gl::{wrap_current_framebuffer, with_current_gl};
use plywood_gl::{ContextAttributes, HeadlessContext, RenderTargetAttributes};
use png::{BitDepth, ColorType, Encoder};
use skia_safe::{Color, Paint, Rect};
use std::fs::File;
use std::path::Path;

const FRAMEBUFFER_WIDTH: i32 = 640;
const FRAMEBUFFER_HEIGHT: i32 = 480;

static APP_NAME: &str = "plywood-gl offscreen example";

fn main() {
    env_logger::init();

    let matches = App::new(APP_NAME)
        .arg(
            Arg::with_name("OUTPUT")
                .required(true)
                .index(1)
                .help("Output PNG file"),
        )
        .get_matches();

    let output_path = Path::new(matches.value_of("OUTPUT").unwrap()).to_owned();
    let output_file = File::create(output_path).unwrap();

    let size = Size2D::new(FRAMEBUFFER_WIDTH, FRAMEBUFFER_HEIGHT);
    let mut context = HeadlessContext::with_size(&ContextAttributes::default(), &size).unwrap();
    context.make_current().unwrap();

    initialize_gl_state();
    let framebuffer = query_framebuffer_info(context.handles().display);
    println!("drawing into framebuffer {}", framebuffer.buffer);

    let mut gr_context = gr_context().unwrap();
    let attributes = RenderTargetAttributes::for_current_framebuffer(size).unwrap();
    let mut surface = wrap_current_framebuffer(&mut gr_context, &attributes).unwrap();

    let canvas = surface.canvas();
    canvas.clear(Color::from_argb(255, 77, 77, 77));
    let mut paint = Paint::default();
    paint.set_anti_alias(true);
    paint.set_color(Color::from_argb(255, 230, 120, 40));
    canvas.draw_round_rect(Rect::from_xywh(80.0, 60.0, 300.0, 200.0), 24.0, 24.0, &paint);
    paint.set_color(Color::from_argb(200, 40, 140, 230));
    canvas.draw_circle((420.0, 300.0), 120.0, &paint);
    gr_context.flush_and_submit();

    let mut pixels = with_current_gl(|gl| gl_utils::read_pixels(gl, &size)).unwrap();
    drop(surface);
    reset_gr_context(false);
    context.destroy().unwrap();

    // GL reads bottom row first.
    let stride = FRAMEBUFFER_WIDTH as usize * 4;
    let rows: Vec<Vec<u8>> = pixels.chunks(stride).rev().map(|row| row.to_vec()).collect();
    pixels = rows.concat();

    let mut encoder = Encoder::new(
        output_file,
        FRAMEBUFFER_WIDTH as u32,
        FRAMEBUFFER_HEIGHT as u32,
    );
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    let mut image_writer = encoder.write_header().unwrap();
    image_writer.write_image_data(&pixels).unwrap();
}
