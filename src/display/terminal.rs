use super::formatter::{format_identity, format_value};
use std::io::{self, Write};
use zfs_kstat_exporter::zfs::Measurement;

/// Human-readable listing of one pass, colored when the terminal allows it
pub struct Terminal {
    pub supports_color: bool,
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            supports_color: console::colors_enabled(),
        }
    }

    fn style(&self, style: console::Style) -> console::Style {
        if self.supports_color {
            style
        } else {
            console::Style::new()
        }
    }

    /// Header line naming the source and the collection time
    pub fn write_header<W: Write>(&self, out: &mut W, source: &str) -> io::Result<()> {
        let title = format!(
            " ZFS kstats via {} @ {} ",
            source,
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S")
        );
        let banner = format!("{:=^80}", title);
        writeln!(
            out,
            "{}",
            self.style(console::Style::new().bold()).apply_to(banner)
        )
    }

    /// One aligned `name{label}  value` line per measurement
    pub fn write_measurements<W: Write>(
        &self,
        out: &mut W,
        measurements: &[Measurement],
    ) -> io::Result<()> {
        let identities: Vec<String> = measurements.iter().map(format_identity).collect();
        let width = identities.iter().map(String::len).max().unwrap_or(0);
        let name_style = self.style(console::Style::new().cyan());
        let value_style = self.style(console::Style::new().green());

        for (identity, measurement) in identities.iter().zip(measurements) {
            writeln!(
                out,
                "{}  {}",
                name_style.apply_to(format!("{:<width$}", identity, width = width)),
                value_style.apply_to(format_value(measurement.value))
            )?;
        }
        writeln!(out, "{:=^80}", format!(" {} measurements ", measurements.len()))
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}
