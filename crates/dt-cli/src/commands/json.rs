//! Json command implementation

use anyhow::Result;

use crate::cli::JsonArgs;
use crate::commands::common::read_input;

/// Execute the json command
pub fn execute(args: &JsonArgs) -> Result<()> {
    let text = read_input(&args.file)?;
    println!("{}", reformat(&text, args.compact)?);
    Ok(())
}

fn reformat(text: &str, compact: bool) -> Result<String> {
    let value = dt_core::json::unserialize(text)?;
    Ok(if compact {
        dt_core::json::serialize(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reformat_compact() {
        let out = reformat("{ \"a\" : [1, 2] }", true).unwrap();
        assert_eq!(out, r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_reformat_repairs_control_characters() {
        let out = reformat("{\"note\":\"two\nlines\"}", true).unwrap();
        assert_eq!(out, r#"{"note":"two\nlines"}"#);
    }

    #[test]
    fn test_reformat_rejects_garbage() {
        assert!(reformat("not json at all", false).is_err());
    }
}
