//! Logger setup for the tutorial programs.

use crate::error::Result;

/// Routes the `log` macros to stdout with a local timestamp.
///
/// Noisy dependencies are capped at `Warn` regardless of `level`.
pub fn init(level: log::LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:<5} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .level_for("tobj", log::LevelFilter::Warn)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}
