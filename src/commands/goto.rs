use crate::core::{
    command_init::{CommandInit, GlobalOptions},
    error::{HeadyError, Result},
    navigate::{goto, GotoTarget},
    print_info,
};

/// Parse `next|prev|tip|upstream` plus the optional upstream name.
pub fn parse_goto_target(direction: &str, upstream: Option<String>) -> Result<GotoTarget> {
    match (direction, upstream) {
        ("upstream", Some(name)) => Ok(GotoTarget::Upstream(name)),
        ("upstream", None) => Err(HeadyError::navigation("No upstream provided")),
        (_, Some(_)) => Err(HeadyError::navigation(
            "<upstream> is only allowed with 'goto upstream <upstream>'",
        )),
        ("next", None) => Ok(GotoTarget::Next),
        ("prev", None) => Ok(GotoTarget::Prev),
        ("tip", None) => Ok(GotoTarget::Tip),
        (other, None) => Err(HeadyError::navigation(format!(
            "Unknown direction '{other}'. Use next, prev, tip or upstream"
        ))),
    }
}

pub fn execute_goto(
    options: &GlobalOptions,
    direction: &str,
    upstream: Option<String>,
) -> Result<()> {
    let target = parse_goto_target(direction, upstream)?;
    let mut repo = CommandInit::initialize(options)?;
    let sha = goto(&mut repo, &target)?;
    print_info(&format!("HEAD is now at {sha}"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_goto_target() {
        assert_eq!(parse_goto_target("next", None).unwrap(), GotoTarget::Next);
        assert_eq!(parse_goto_target("tip", None).unwrap(), GotoTarget::Tip);
        assert_eq!(
            parse_goto_target("upstream", Some("origin/a".to_string())).unwrap(),
            GotoTarget::Upstream("origin/a".to_string())
        );
        assert!(parse_goto_target("upstream", None).is_err());
        assert!(parse_goto_target("prev", Some("origin/a".to_string())).is_err());
        assert!(parse_goto_target("sideways", None).is_err());
    }
}
