use crate::core::{
    annotate::{attach_upstream, UpstreamOutcome},
    command_init::{CommandInit, GlobalOptions},
    error::Result,
    print_info, print_success,
};

pub fn execute_upstream(options: &GlobalOptions, upstream_ref: &str, rev: &str) -> Result<()> {
    let mut repo = CommandInit::initialize(options)?;

    match attach_upstream(&mut repo, upstream_ref, rev)? {
        UpstreamOutcome::AlreadyAttached { sha } => {
            print_info(&format!("{sha} already has upstream {upstream_ref}"));
        }
        UpstreamOutcome::Attached(outcome) => {
            print_success(&format!(
                "Added upstream {upstream_ref} to {} ({} child commit(s) restacked).",
                outcome.amended.sha,
                outcome.moved.len()
            ));
        }
    }
    Ok(())
}
