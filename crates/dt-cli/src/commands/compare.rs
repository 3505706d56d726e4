//! Compare command implementation

use anyhow::Result;
use dt_core::compare_versions;
use std::cmp::Ordering;

use crate::cli::CompareArgs;

/// Execute the compare command
pub fn execute(args: &CompareArgs) -> Result<()> {
    println!("{}", describe(&args.left, &args.right));
    Ok(())
}

fn describe(left: &str, right: &str) -> String {
    let op = match compare_versions(left, right) {
        Ordering::Less => "<",
        Ordering::Equal => "==",
        Ordering::Greater => ">",
    };
    format!("{left} {op} {right}")
}
