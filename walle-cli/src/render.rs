use std::io::{self, Write};

use walle::Snapshot;

/// Plain-text PPM (P3), one canvas cell per pixel.
pub fn write_ppm(snapshot: &Snapshot, mut out: impl Write) -> io::Result<()> {
    let size = snapshot.size();
    writeln!(out, "P3")?;
    writeln!(out, "{size} {size}")?;
    writeln!(out, "255")?;
    for row in snapshot.to_buffer().chunks(size.max(1)) {
        let line: Vec<String> = row
            .iter()
            .map(|rgb| format!("{} {} {}", (rgb >> 16) & 0xFF, (rgb >> 8) & 0xFF, rgb & 0xFF))
            .collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    Ok(())
}

pub fn text(snapshot: &Snapshot) -> String {
    let size = snapshot.size();
    let mut out = format!("┌{}┐\n", "─".repeat(size));
    for row in snapshot.rows() {
        out.push('│');
        out.extend(row.iter().map(|color| color.symbol()));
        out.push_str("│\n");
    }
    out.push_str(&format!("└{}┘\n", "─".repeat(size)));
    out
}
