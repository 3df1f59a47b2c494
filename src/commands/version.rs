//! `feature-release version`

use crate::core::context::ReleaseContext;
use crate::core::error::ReleaseResult;
use crate::release::version::read_version;

/// Print the version the next release would use
pub fn run_version(ctx: &ReleaseContext, json: bool) -> ReleaseResult<()> {
  let descriptor = ctx.resolve(&ctx.config.feature.descriptor_path());
  let version = read_version(&descriptor)?;

  if json {
    let value = serde_json::json!({
      "feature": ctx.config.feature.id,
      "version": version,
      "descriptor": descriptor,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
  } else {
    println!("{}", version);
  }

  Ok(())
}
