use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;

mod common;
use common::{assertions, repository::*};

#[cfg(test)]
mod move_command_tests {
    use super::*;

    #[test]
    fn test_move_restacks_subtree() -> anyhow::Result<()> {
        let repo = setup_test_repo()?;
        let a = repo.commit("Feature")?;
        repo.commit("Feature tests")?;
        repo.checkout("main")?;
        let dest = repo.commit("Refactor")?;

        repo.heady()?
            .args(["move", &a, &dest])
            .assert()
            .success()
            .stdout(predicate::str::contains("Moved 2 commit(s)"));

        // HEAD ends on the last moved commit
        assert_eq!(repo.git(&["log", "-1", "--format=%s"])?, "Feature tests");
        assert_eq!(repo.git(&["log", "-1", "--format=%s", "HEAD~1"])?, "Feature");
        assert_eq!(repo.rev_parse("HEAD~2")?, dest);

        // The original commits are superseded and leave the tree
        repo.heady()?
            .arg("tree")
            .assert()
            .success()
            .stdout(assertions::shows_commit(&a).not());

        Ok(())
    }

    #[test]
    fn test_move_trunk_commit_fails() -> anyhow::Result<()> {
        let repo = setup_test_repo()?;
        let a = repo.commit("Stack commit")?;

        repo.heady()?
            .args(["move", "main", &a])
            .assert()
            .failure()
            .stderr(assertions::in_trunk_error("move"));

        Ok(())
    }

    #[test]
    fn test_move_with_dirty_tree_fails() -> anyhow::Result<()> {
        let repo = setup_test_repo()?;
        let a = repo.commit("Feature")?;
        repo.checkout("main")?;
        let dest = repo.commit("Refactor")?;
        fs::write(repo.path().join("Refactor.txt"), "uncommitted\n")?;

        repo.heady()?
            .args(["move", &a, &dest])
            .assert()
            .failure()
            .stderr(predicate::str::contains("uncommitted changes"));

        assert_eq!(repo.rev_parse("HEAD")?, dest);
        Ok(())
    }

    #[test]
    fn test_fixup_reattaches_stack_after_amend() -> anyhow::Result<()> {
        let repo = setup_test_repo()?;
        let a = repo.commit("Base change")?;
        repo.commit("Dependent change")?;
        repo.checkout(&a)?;
        repo.git(&["commit", "-q", "--amend", "-m", "Base change, reworded"])?;
        let amended = repo.rev_parse("HEAD")?;

        repo.heady()?
            .arg("fixup")
            .assert()
            .success()
            .stdout(predicate::str::contains("Restacked 1 commit(s)"));

        assert_eq!(repo.rev_parse("HEAD")?, amended);
        let children = repo.git(&["log", "--reflog", "--format=%P %s"])?;
        assert!(children.contains(&format!("{amended} Dependent change")));
        Ok(())
    }
}
