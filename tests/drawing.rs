//! Pixel surface, frame store and bulk transfer behavior.

mod common;

use common::{words, Op, Recorder, RecordingDelay};
use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    Pixel,
};
use ili9163c::command::Command;
use ili9163c::{Ili9163c, Panel, PixelSurface, RedPcb144, RedPcb22};

fn unbuffered<P: Panel>() -> Ili9163c<Recorder, P> {
    let mut display = Ili9163c::new(Recorder::default());
    display.init(&mut RecordingDelay::default()).unwrap();
    display.interface.clear();
    display
}

fn buffered<P: Panel>() -> Ili9163c<Recorder, P> {
    let mut display = Ili9163c::with_frame_store(Recorder::default());
    display.init(&mut RecordingDelay::default()).unwrap();
    display.interface.clear();
    display
}

#[test]
fn out_of_range_pixels_are_dropped() {
    for rotation in 0..4 {
        let mut direct = unbuffered::<RedPcb22>();
        let mut stored = buffered::<RedPcb22>();
        direct.set_rotation(rotation).unwrap();
        stored.set_rotation(rotation).unwrap();
        direct.interface.clear();
        stored.interface.clear();

        let (w, h) = (i32::from(direct.width()), i32::from(direct.height()));
        for (x, y) in [(-1, 0), (0, -1), (w, 0), (0, h), (w, h), (i32::MIN, i32::MAX)] {
            direct.set_pixel(x, y, 0xffff).unwrap();
            stored.set_pixel(x, y, 0xffff).unwrap();
        }

        assert!(direct.interface.ops.is_empty());
        assert!(stored.interface.ops.is_empty());
        let fb = stored.frame_store().unwrap();
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }
}

#[test]
fn strict_mode_reports_dropped_pixels() {
    let mut display = unbuffered::<RedPcb144>();
    display.set_strict(true);
    assert_eq!(
        display.set_pixel(128, 0, 0xffff),
        Err(ili9163c::DisplayError::OutOfBounds)
    );
    assert!(display.interface.ops.is_empty());
}

#[test]
fn unbuffered_pixel_addresses_one_pixel_window() {
    let mut display = unbuffered::<RedPcb144>();
    display.set_pixel(3, 4, 0xf81f).unwrap();
    assert_eq!(
        display.interface.ops,
        [
            Op::Command(Command::ColumnAddressSet),
            Op::Data(words(&[3])),
            Op::Data(words(&[3])),
            Op::Command(Command::PageAddressSet),
            Op::Data(words(&[36])),
            Op::Data(words(&[36])),
            Op::Command(Command::MemoryWrite),
            Op::Data(vec![0xf8, 0x1f]),
        ]
    );
}

#[test]
fn buffered_pixel_round_trips_every_color() {
    let mut display = buffered::<RedPcb144>();
    for (x, y) in [(0u16, 0u16), (127, 127), (17, 99)] {
        for c in 0..=u16::MAX {
            display.set_pixel(x.into(), y.into(), c).unwrap();
            let off = (usize::from(y) * 128 + usize::from(x)) * 2;
            let bytes = display.frame_store().unwrap().as_bytes();
            assert_eq!([bytes[off], bytes[off + 1]], c.to_be_bytes());
        }
    }
    assert!(display.interface.ops.is_empty());
}

#[test]
fn commit_pushes_whole_buffer_between_home_windows() {
    let mut display = buffered::<RedPcb144>();
    display.set_pixel(1, 0, 0xabcd).unwrap();
    display.commit_frame_store().unwrap();

    let di = &display.interface;
    assert_eq!(
        di.commands(),
        [
            Command::ColumnAddressSet,
            Command::PageAddressSet,
            Command::MemoryWrite,
            Command::MemoryWrite,
            Command::ColumnAddressSet,
            Command::PageAddressSet,
            Command::MemoryWrite,
        ]
    );
    assert_eq!(di.data_of(Command::ColumnAddressSet, 0), words(&[0, 128]));
    assert_eq!(di.data_of(Command::PageAddressSet, 0), words(&[32, 192]));
    assert_eq!(di.data_of(Command::ColumnAddressSet, 1), words(&[0, 128]));

    let pushed = di.data_of(Command::MemoryWrite, 1);
    assert_eq!(pushed.len(), 128 * 128 * 2);
    assert_eq!(pushed[2..4], [0xab, 0xcd]);
}

#[test]
fn commit_without_frame_store_is_noop() {
    let mut display = unbuffered::<RedPcb144>();
    display.commit_frame_store().unwrap();
    assert!(display.interface.ops.is_empty());
}

#[test]
fn bulk_load_24_quantizes_and_homes() {
    let mut display = unbuffered::<RedPcb144>();
    display
        .write_screen24(&[0xff8000, 0xffffff, 0x000000])
        .unwrap();

    let di = &display.interface;
    assert_eq!(di.ops[0], Op::Command(Command::MemoryWrite));
    assert_eq!(
        di.data_of(Command::MemoryWrite, 0),
        words(&[0b11111_100000_00000, 0xffff, 0x0000])
    );
    assert_eq!(
        di.commands()[1..],
        [
            Command::ColumnAddressSet,
            Command::PageAddressSet,
            Command::MemoryWrite,
        ]
    );
}

#[test]
fn write_screen16_sends_bytes_untouched() {
    let mut display = unbuffered::<RedPcb144>();
    display.write_screen16(&[1, 2, 3, 4]).unwrap();
    assert_eq!(display.interface.ops[1], Op::Data(vec![1, 2, 3, 4]));
}

#[test]
fn row_write_is_clipped_to_width() {
    let mut display = unbuffered::<RedPcb144>();
    let row: Vec<u8> = (0..20).collect();
    display.write_row(5, 120, 10, &row).unwrap();

    let di = &display.interface;
    assert_eq!(di.data_of(Command::ColumnAddressSet, 0), words(&[120, 127]));
    assert_eq!(di.data_of(Command::PageAddressSet, 0), words(&[37, 37]));
    assert_eq!(di.data_of(Command::MemoryWrite, 0), row[..16]);

    display.interface.clear();
    display.write_row(128, 0, 1, &[0, 0]).unwrap();
    display.write_row(0, 128, 1, &[0, 0]).unwrap();
    assert!(display.interface.ops.is_empty());
}

#[test]
fn row_write_lands_in_frame_store() {
    let mut display = buffered::<RedPcb144>();
    display.write_row(5, 2, 2, &[1, 2, 3, 4]).unwrap();
    let fb = display.frame_store().unwrap();
    assert_eq!(fb.get_pixel(2, 5), Some(0x0102));
    assert_eq!(fb.get_pixel(3, 5), Some(0x0304));
    assert!(display.interface.ops.is_empty());
}

#[test]
fn window_write_streams_colors() {
    let mut display = unbuffered::<RedPcb144>();
    display.begin_window_write(0, 0, 2, 0).unwrap();
    display.push_color(0x1234).unwrap();
    assert_eq!(display.push_colors([0x0001, 0x0002]).unwrap(), 2);
    display.end_window_write().unwrap();

    let di = &display.interface;
    assert_eq!(di.data_of(Command::MemoryWrite, 0), words(&[0x1234, 1, 2]));
    assert_eq!(di.data_of(Command::ColumnAddressSet, 1), words(&[0, 128]));
}

#[test]
fn fill_screen_uses_one_window() {
    let mut display = unbuffered::<RedPcb144>();
    display.fill_screen(0x07e0).unwrap();

    let di = &display.interface;
    assert_eq!(di.data_of(Command::ColumnAddressSet, 0), words(&[0, 127]));
    assert_eq!(di.data_of(Command::PageAddressSet, 0), words(&[32, 159]));
    let data = di.data_of(Command::MemoryWrite, 0);
    assert_eq!(data.len(), 128 * 128 * 2);
    assert!(data.chunks(2).all(|px| px == [0x07, 0xe0]));
}

#[test]
fn fill_screen_buffered_touches_only_memory() {
    let mut display = buffered::<RedPcb144>();
    display.fill_screen(0x07e0).unwrap();
    assert!(display.interface.ops.is_empty());
    assert_eq!(display.frame_store().unwrap().get_pixel(64, 64), Some(0x07e0));
}

#[test]
fn fill_solid_is_clipped_to_display() {
    let mut display = unbuffered::<RedPcb144>();
    display
        .fill_solid(
            &Rectangle::new(Point::new(120, 120), Size::new(20, 20)),
            Rgb565::RED,
        )
        .unwrap();

    let di = &display.interface;
    assert_eq!(di.data_of(Command::ColumnAddressSet, 0), words(&[120, 127]));
    assert_eq!(di.data_of(Command::PageAddressSet, 0), words(&[152, 159]));
    assert_eq!(di.data_of(Command::MemoryWrite, 0), words(&[0xf800; 64]));
}

#[test]
fn fill_solid_outside_display_sends_nothing() {
    let mut display = unbuffered::<RedPcb144>();
    display
        .fill_solid(
            &Rectangle::new(Point::new(200, 0), Size::new(5, 5)),
            Rgb565::RED,
        )
        .unwrap();
    assert!(display.interface.ops.is_empty());
}

#[test]
fn embedded_graphics_draws_into_frame_store() {
    let mut display = buffered::<RedPcb144>();
    display.set_strict(true);

    Line::new(Point::new(0, 0), Point::new(3, 0))
        .into_styled(PrimitiveStyle::with_stroke(Rgb565::GREEN, 1))
        .draw(&mut display)
        .unwrap();
    // clipped silently, even in strict mode
    Pixel(Point::new(-5, 500), Rgb565::WHITE)
        .draw(&mut display)
        .unwrap();

    let fb = display.frame_store().unwrap();
    for x in 0..4 {
        assert_eq!(fb.get_pixel(x, 0), Some(0x07e0));
    }
    assert_eq!(fb.get_pixel(4, 0), Some(0));
    assert_eq!(display.size(), Size::new(128, 128));
}

#[test]
fn bounding_box_follows_rotation() {
    let mut display = unbuffered::<RedPcb22>();
    display.set_rotation(1).unwrap();
    assert_eq!(display.bounding_box().size, Size::new(160, 128));
}

fn paint_corner<S: PixelSurface>(surface: &mut S) -> Result<(), S::Error> {
    surface.fill_rect(-2, -2, 4, 4, 0xffff)
}

#[test]
fn generic_surface_fill_rect_clips() {
    let mut display = buffered::<RedPcb144>();
    paint_corner(&mut display).unwrap();

    let fb = display.frame_store().unwrap();
    let painted: usize = (0..4)
        .flat_map(|y| (0..4).map(move |x| (x, y)))
        .filter(|&(x, y)| fb.get_pixel(x, y) == Some(0xffff))
        .count();
    assert_eq!(painted, 4);
    assert_eq!(fb.get_pixel(1, 1), Some(0xffff));
    assert_eq!(fb.get_pixel(2, 2), Some(0));
}

#[test]
fn surface_fill_rect_near_coordinate_limit_is_dropped() {
    let mut display = buffered::<RedPcb144>();
    PixelSurface::fill_rect(&mut display, i32::MAX - 1, 0, 10, 10, 0xffff).unwrap();
    PixelSurface::fill_rect(&mut display, 0, i32::MAX - 1, 10, 10, 0xffff).unwrap();

    let fb = display.frame_store().unwrap();
    assert!(fb.as_bytes().iter().all(|&b| b == 0));
}
