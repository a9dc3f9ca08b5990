//! Terminal renderer
//!
//! Legend: `#` border, `.` neutral, `A`..`Z` captured, `a`..`z` claimed,
//! `0`..`9` heads (player id modulo the alphabet / ten).

use std::io::Write;
use std::time::Duration;

use hexario_core::{FrameSink, Hex, Snapshot};

/// Draw a snapshot as rows of offset hex cells
pub fn render_frame(frame: &Snapshot) -> String {
    let radius = frame.map_radius as i32;
    let mut out = String::new();

    for r in -radius..=radius {
        out.push_str(&" ".repeat(r.unsigned_abs() as usize));
        let q_min = (-radius).max(-r - radius);
        let q_max = radius.min(-r + radius);
        for q in q_min..=q_max {
            out.push(cell_char(frame, Hex::new(q, r)));
            out.push(' ');
        }
        // trailing space is noise in diffs
        out.pop();
        out.push('\n');
    }

    out
}

fn cell_char(frame: &Snapshot, hex: Hex) -> char {
    if let Some(id) = frame.head_at(hex) {
        return char::from(b'0' + (id % 10) as u8);
    }
    let Some(tile) = frame.tile(hex) else {
        return '#';
    };
    let letter = |id: usize, base: u8| char::from(base + (id % 26) as u8);
    match (tile.claimed_by(), tile.owner()) {
        (Some(c), _) => letter(c, b'a'),
        (None, Some(o)) => letter(o, b'A'),
        (None, None) => '.',
    }
}

/// Writes each frame with a status line to any writer
pub struct AsciiSink<W: Write> {
    out: W,
    delay: Duration,
}

impl<W: Write> AsciiSink<W> {
    pub fn new(out: W, delay: Duration) -> Self {
        Self { out, delay }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl AsciiSink<std::io::Stdout> {
    pub fn stdout(delay: Duration) -> Self {
        Self::new(std::io::stdout(), delay)
    }
}

impl<W: Write> FrameSink for AsciiSink<W> {
    fn present(&mut self, frame: &Snapshot) -> bool {
        let text = format!(
            "tick {} | alive {}/{}\n{}\n",
            frame.tick,
            frame.alive(),
            frame.players.len(),
            render_frame(frame)
        );

        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!("Terminal output failed, stopping: {}", e);
            return true;
        }

        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        false
    }
}
