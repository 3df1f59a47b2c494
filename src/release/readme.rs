//! Generated README for a variant's release directory
//!
//! The document is fixed instructional text; only the product name, version,
//! date and checksum line vary.

use crate::core::error::{ReleaseResult, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the generated README inside a release directory
pub const README_FILE_NAME: &str = "README.md";

/// Values interpolated into the README
#[derive(Debug, Clone)]
pub struct ReadmeFields<'a> {
  pub product: &'a str,
  pub version: &'a str,
  pub date: &'a str,
  pub hash: &'a str,
}

/// Render the README text
pub fn render_readme(fields: &ReadmeFields<'_>) -> String {
  format!(
    "\
# {product}

Product: {product}
Version: {version}
Date: {date}

SHA256: {hash}

Package content:
---------------
* DEH Capella feature with the DEH Capella Plugin

Installation:
------------
1) \tUnzip the content of the downloaded adapter plugin somewhere locally.
2)\tIn a running instance of Capella go to the “Help” menu and choose “Install new software”.
3)\tFrom the “Install new software” dialog add a new source, choose local and browse to the location where you unzipped the adapter.
4)\tThe adapter should now be listed as available to install, if not try by unchecking the “Show items by category” checkbox.
5)\tSelect the adapter and press next to proceed to the installation.
6)\tAfter the installation is complete Capella will invite you to restart Capella to complete the installation.

Initialize Hub server connection
-----------------------------
1) \tOpening of the adapter panels can be performed by pressing the button with the COMET icon in the tool bar. The button itself is a dropdown one,
\twhere you can choose to open or close either the Impact View or the Hub Browser..
2) \tFrom the hub browser one click on connect.
3) \tFill out the dialog boxes with your usual Comet credentials, once done the browsers.
\tshould show the ElementDefinition tree as well as the RequirementsSpecification tree.

SCENARIO instructions: Capella model to Hub
------------------------------------
1)\tFirst, change the transfer direction so that the mapping source is the Capella model.
2)\tSelect one Element to be mapped with its children in one of the Capella element trees.
3)\tRight click on your selection and select “Map Selection”.
4)\tMap one of the selected Capella Element to one ElementDefinition or use the automatic mapping.
5)\tMap one of the selected Requirement Element to one RequirementsSpecification or use the automatic mapping.
6)\tSelect the mapped element in the impact view that you wish to transfer.
7)\tClick on Transfer
",
    product = fields.product,
    version = fields.version,
    date = fields.date,
    hash = fields.hash,
  )
}

/// Write the README into `release_dir`, replacing any previous one
pub fn write_readme(release_dir: &Path, fields: &ReadmeFields<'_>) -> ReleaseResult<PathBuf> {
  let path = release_dir.join(README_FILE_NAME);
  fs::write(&path, render_readme(fields)).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(path)
}
