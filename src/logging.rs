use anyhow::Result;
use tracing_subscriber::fmt;

pub fn init(verbose: bool) -> Result<()> {
    if !verbose {
        return Ok(());
    }
    let _ = fmt().with_target(false).with_level(true).compact().try_init();
    Ok(())
}
