//! Property-based tests for chunked partial writes.
//! Checks slice count, pixel reconstruction, clamping and argument rejection
//! over arbitrary panels, transfer limits and rectangles.

use badge_bsp::command::{CASET, RAMWR, RASET};
use badge_bsp::{Builder, DataCommand, Dimensions, Display, DisplayInterface, Error};
use embedded_hal::delay::DelayNs;
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
    Command(u8),
    Data(Vec<u8>),
}

#[derive(Debug, Default)]
struct RecordingInterface {
    attached: bool,
    ops: Vec<Op>,
}

impl DisplayInterface for RecordingInterface {
    type Error = ();

    fn attach(&mut self) -> Result<(), ()> {
        self.attached = true;
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn send(&mut self, bytes: &[u8], level: DataCommand) -> Result<(), ()> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.ops.push(match level {
            DataCommand::Command => Op::Command(bytes[0]),
            DataCommand::Data => Op::Data(bytes.to_vec()),
        });
        Ok(())
    }

    fn reset<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), ()> {
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fn ready_display(width: u16, height: u16, max_transfer: usize) -> Display<RecordingInterface> {
    let config = Builder::new()
        .dimensions(Dimensions::new(width, height).unwrap())
        .max_transfer_size(max_transfer)
        .chip_select(5)
        .data_command(33)
        .build()
        .unwrap();
    let mut display = Display::new(RecordingInterface::default(), config);
    display.initialize(&mut NoDelay).unwrap();
    display.interface_mut().ops.clear();
    display
}

fn source_buffer(width: u16, height: u16) -> Vec<u8> {
    (0..usize::from(width) * usize::from(height) * 2)
        .map(|i| (i * 7 % 251) as u8)
        .collect()
}

fn span(word: &[u8]) -> (u16, u16) {
    (
        u16::from_be_bytes([word[0], word[1]]),
        u16::from_be_bytes([word[2], word[3]]),
    )
}

/// Replays recorded ops into a blank panel image.
/// Returns the image and the number of addressing windows opened, or `None`
/// if the ops are not a run of windows each followed by its rows.
fn replay(ops: &[Op], width: u16, height: u16) -> Option<(Vec<Option<u8>>, usize)> {
    let stride = usize::from(width) * 2;
    let mut image = vec![None; stride * usize::from(height)];
    let mut windows = 0;
    let mut i = 0;
    while i < ops.len() {
        let (Op::Command(CASET), Op::Data(xs), Op::Command(RASET), Op::Data(ys), Op::Command(RAMWR)) = (
            &ops[i],
            &ops[i + 1],
            &ops[i + 2],
            &ops[i + 3],
            &ops[i + 4],
        ) else {
            return None;
        };
        windows += 1;
        let (x0, x1) = span(xs);
        let (y0, y1) = span(ys);
        i += 5;
        for row in y0..=y1 {
            let Op::Data(run) = &ops[i] else {
                return None;
            };
            assert_eq!(run.len(), usize::from(x1 - x0 + 1) * 2);
            let start = usize::from(row) * stride + usize::from(x0) * 2;
            for (k, byte) in run.iter().enumerate() {
                image[start + k] = Some(*byte);
            }
            i += 1;
        }
    }
    Some((image, windows))
}

fn panel() -> impl Strategy<Value = (u16, u16, usize)> {
    (1u16..=48, 1u16..=12, 1usize..=40).prop_map(|(w, h, half)| (w, h, half * 2))
}

fn rect_in(width: u16, height: u16) -> impl Strategy<Value = (u16, u16, u16, u16)> {
    (0..width, 0..width, 0..height, 0..height)
        .prop_map(|(a, b, c, d)| (a.min(b), c.min(d), a.max(b), c.max(d)))
}

proptest! {
    /// Slice count is ceil(w*2 / max_transfer) and every pixel in the
    /// rectangle lands exactly once, nothing outside it.
    #[test]
    fn write_partial_reproduces_rectangle(
        ((width, height, max), (x0, y0, x1, y1)) in panel()
            .prop_flat_map(|(w, h, m)| (Just((w, h, m)), rect_in(w, h)))
    ) {
        let mut display = ready_display(width, height, max);
        let buffer = source_buffer(width, height);
        display.write_partial(&buffer, x0, y0, x1, y1).unwrap();

        let replayed = replay(&display.interface().ops, width, height);
        prop_assert!(replayed.is_some());
        let (image, windows) = replayed.unwrap();
        let w = usize::from(x1 - x0) + 1;
        prop_assert_eq!(windows, (w * 2).div_ceil(max));

        let stride = usize::from(width) * 2;
        for y in 0..height {
            for x in 0..width {
                let at = usize::from(y) * stride + usize::from(x) * 2;
                let inside = (x0..=x1).contains(&x) && (y0..=y1).contains(&y);
                for b in at..at + 2 {
                    if inside {
                        prop_assert_eq!(image[b], Some(buffer[b]));
                    } else {
                        prop_assert_eq!(image[b], None);
                    }
                }
            }
        }
    }

    /// Corners past the edge behave exactly like corners on the edge.
    #[test]
    fn write_partial_clamps_overshoot(
        ((width, height, max), (x0, y0, _, _)) in panel()
            .prop_flat_map(|(w, h, m)| (Just((w, h, m)), rect_in(w, h))),
        over_x in 0u16..1000,
        over_y in 0u16..1000,
    ) {
        let buffer = source_buffer(width, height);

        let mut clamped = ready_display(width, height, max);
        clamped.write_partial(&buffer, x0, y0, width - 1, height - 1).unwrap();

        let mut overshot = ready_display(width, height, max);
        overshot
            .write_partial(&buffer, x0, y0, width - 1 + over_x, height - 1 + over_y)
            .unwrap();

        prop_assert_eq!(&overshot.interface().ops, &clamped.interface().ops);
    }

    /// Inverted rectangles fail before any transfer.
    #[test]
    fn write_partial_rejects_inverted_without_transfers(
        (width, height, max) in panel(),
        a in 0u16..600,
        b in 0u16..600,
        c in 0u16..600,
        d in 0u16..600,
    ) {
        prop_assume!(a > b || c > d);
        let mut display = ready_display(width, height, max);
        let buffer = source_buffer(width, height);
        let result = display.write_partial(&buffer, a, c, b, d);
        let is_invalid_region = matches!(result, Err(Error::InvalidRegion { .. }));
        prop_assert!(is_invalid_region);
        prop_assert!(display.interface().ops.is_empty());
    }
}
