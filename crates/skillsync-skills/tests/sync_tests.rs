#[cfg(test)]
mod tests {
    use filetime::{FileTime, set_file_mtime};
    use skillsync_config::{SlugCollisionPolicy, SyncConfig};
    use skillsync_core::{Level, Skill, Step, SyncError, Task};
    use skillsync_skills::{SkillSync, SyncAction, SyncPlan, SyncReason, corpus, yaml};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        yaml: PathBuf,
        markdown: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let yaml = dir.path().join("data").join("skills.yaml");
            let markdown = dir.path().join("data").join("skills");
            Self {
                _dir: dir,
                yaml,
                markdown,
            }
        }

        fn engine(&self) -> SkillSync {
            SkillSync::new(&self.yaml, &self.markdown)
        }

        fn write_yaml(&self, skills: &[Skill], mtime: i64) {
            yaml::save(&self.yaml, skills).unwrap();
            touch(&self.yaml, mtime);
        }

        fn write_markdown(&self, skills: &[Skill], mtime: i64) {
            let written =
                corpus::save_markdown_dir(&self.markdown, skills, SlugCollisionPolicy::Error)
                    .unwrap();
            for path in written {
                touch(&path, mtime);
            }
        }

        fn markdown_files(&self) -> Vec<PathBuf> {
            corpus::discover_markdown(&self.markdown).unwrap()
        }
    }

    fn touch(path: &Path, secs: i64) {
        set_file_mtime(path, FileTime::from_unix_time(secs, 0)).unwrap();
    }

    fn mtime(path: &Path) -> FileTime {
        FileTime::from_last_modification_time(&std::fs::metadata(path).unwrap())
    }

    fn corpus_fixture() -> Vec<Skill> {
        let mut terminal = Skill::new("Terminal Basics", Level::Basic);
        terminal.tasks = vec![Task {
            name: "Navigate".into(),
            steps: vec![Step::new("Action", "Change directory (1)")],
            commands: Some(vec!["cd ~/projects".into()]),
        }];

        let mut git = Skill::new("Git Basics", Level::Basic);
        git.prerequisites = vec!["Terminal Basics".into()];
        git.tasks = vec![Task {
            name: "Create a repository".into(),
            steps: vec![
                Step::new("Setup", "Make a folder (1)"),
                Step::new("Action", "Initialise it (2)"),
            ],
            commands: Some(vec!["mkdir demo".into(), "git init".into()]),
        }];

        let mut rebase = Skill::new("Interactive Rebase", Level::Advanced);
        rebase.prerequisites = vec!["Git Basics".into()];
        rebase.tasks = vec![Task::new("Squash commits")];

        let mut branching = Skill::new("Branching", Level::Intermediate);
        branching.prerequisites = vec!["Git Basics".into()];
        branching.tasks = vec![Task {
            name: "Merge".into(),
            steps: vec![Step::new("Action", "Resolve conflicts, then commit")],
            commands: None,
        }];

        // Not level-sorted on purpose: corpus order has to survive the trip.
        vec![terminal, git, rebase, branching]
    }

    // ── Missing sources ────────────────────────────────────────

    #[test]
    fn test_nothing_to_sync() {
        let fx = Fixture::new();
        let err = fx.engine().run().unwrap_err();
        assert!(matches!(err, SyncError::NoSources { .. }));
    }

    #[test]
    fn test_yaml_only_generates_markdown() {
        let fx = Fixture::new();
        yaml::save(&fx.yaml, &corpus_fixture()).unwrap();

        let report = fx.engine().run().unwrap();
        assert_eq!(report.plan.action, SyncAction::GenerateMarkdown);
        assert_eq!(report.plan.reason, SyncReason::MarkdownMissing);
        assert_eq!(report.skills, 4);
        assert_eq!(report.written.len(), 4);
        assert!(fx.markdown.join("basic").join("git-basics.md").is_file());
        assert!(fx.markdown.join("advanced").join("interactive-rebase.md").is_file());
    }

    #[test]
    fn test_empty_markdown_dir_is_regenerated() {
        let fx = Fixture::new();
        yaml::save(&fx.yaml, &corpus_fixture()).unwrap();
        std::fs::create_dir_all(fx.markdown.join("basic")).unwrap();

        let report = fx.engine().run().unwrap();
        assert_eq!(report.plan.reason, SyncReason::MarkdownEmpty);
        assert_eq!(fx.markdown_files().len(), 4);
    }

    #[test]
    fn test_markdown_only_generates_yaml() {
        let fx = Fixture::new();
        fx.write_markdown(&corpus_fixture(), 1_000);

        let report = fx.engine().run().unwrap();
        assert_eq!(report.plan.action, SyncAction::GenerateYaml);
        assert_eq!(report.plan.reason, SyncReason::YamlMissing);
        assert_eq!(report.written, vec![fx.yaml.clone()]);
        assert_eq!(yaml::load(&fx.yaml).unwrap(), corpus_fixture());
    }

    // ── Timestamp arbitration ──────────────────────────────────

    #[test]
    fn test_yaml_newer_rewrites_markdown() {
        let fx = Fixture::new();
        let mut skills = corpus_fixture();
        fx.write_markdown(&skills, 1_000);

        skills[0].tasks[0].steps[0].text = "Change directory quickly (1)".into();
        fx.write_yaml(&skills, 2_000);

        let report = fx.engine().run().unwrap();
        assert_eq!(report.plan.reason, SyncReason::YamlNewer);
        assert_eq!(mtime(&fx.yaml), FileTime::from_unix_time(2_000, 0));

        let reloaded = corpus::order_for_yaml(corpus::load_markdown_dir(&fx.markdown).unwrap());
        assert_eq!(reloaded, skills);
    }

    #[test]
    fn test_markdown_newer_rewrites_yaml() {
        let fx = Fixture::new();
        let mut skills = corpus_fixture();
        fx.write_yaml(&skills, 1_000);

        skills[1].prerequisites.clear();
        fx.write_markdown(&skills, 2_000);

        let report = fx.engine().run().unwrap();
        assert_eq!(report.plan.reason, SyncReason::MarkdownNewer);
        assert_eq!(yaml::load(&fx.yaml).unwrap(), skills);
    }

    #[test]
    fn test_one_newer_markdown_file_is_enough() {
        let fx = Fixture::new();
        let skills = corpus_fixture();
        fx.write_yaml(&skills, 2_000);
        fx.write_markdown(&skills, 1_000);
        touch(&fx.markdown.join("intermediate").join("branching.md"), 3_000);

        let report = fx.engine().run().unwrap();
        assert_eq!(report.plan.action, SyncAction::GenerateYaml);
    }

    #[test]
    fn test_simultaneous_and_consistent_writes_nothing() {
        let fx = Fixture::new();
        let skills = corpus_fixture();
        fx.write_markdown(&skills, 1_000);
        fx.write_yaml(&skills, 1_000);
        let before = std::fs::read_to_string(&fx.yaml).unwrap();

        let report = fx.engine().run().unwrap();
        assert_eq!(report.plan.action, SyncAction::Validate);
        assert_eq!(report.skills, 4);
        assert!(report.written.is_empty());
        assert_eq!(std::fs::read_to_string(&fx.yaml).unwrap(), before);
        assert_eq!(mtime(&fx.yaml), FileTime::from_unix_time(1_000, 0));
    }

    #[test]
    fn test_simultaneous_and_inconsistent_fails() {
        let fx = Fixture::new();
        let mut skills = corpus_fixture();
        fx.write_markdown(&skills, 1_000);
        skills[3].level = "Advanced".into();
        fx.write_yaml(&skills, 1_000);

        let err = fx.engine().run().unwrap_err();
        let messages = err.discrepancies();
        assert_eq!(
            messages,
            ["Branching: Level mismatch (YAML: Advanced, MD: Intermediate)".to_string()]
        );
    }

    #[test]
    fn test_missing_skill_is_reported_by_name() {
        let fx = Fixture::new();
        let skills = corpus_fixture();
        fx.write_markdown(&skills[..3], 1_000);
        fx.write_yaml(&skills, 1_000);

        let err = fx.engine().run().unwrap_err();
        assert_eq!(
            err.discrepancies(),
            ["Skills in YAML but not markdown: Branching".to_string()]
        );
    }

    #[test]
    fn test_custom_threshold_widens_validation_window() {
        let fx = Fixture::new();
        let skills = corpus_fixture();
        fx.write_markdown(&skills, 1_000);
        fx.write_yaml(&skills, 1_004);

        let engine = fx.engine().with_threshold(std::time::Duration::from_secs(5));
        assert_eq!(engine.plan().unwrap().action, SyncAction::Validate);
        assert_eq!(fx.engine().plan().unwrap().action, SyncAction::GenerateMarkdown);
    }

    // ── Round trips ────────────────────────────────────────────

    #[test]
    fn test_round_trip_preserves_corpus_order() {
        let fx = Fixture::new();
        yaml::save(&fx.yaml, &corpus_fixture()).unwrap();
        fx.engine().run().unwrap();

        std::fs::remove_file(&fx.yaml).unwrap();
        let report = fx.engine().run().unwrap();
        assert_eq!(report.plan.reason, SyncReason::YamlMissing);

        let names: Vec<_> = yaml::load(&fx.yaml)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(
            names,
            ["Terminal Basics", "Git Basics", "Interactive Rebase", "Branching"]
        );
    }

    #[test]
    fn test_regeneration_removes_stale_files() {
        let fx = Fixture::new();
        let mut skills = corpus_fixture();
        fx.write_markdown(&skills, 1_000);
        let notes = fx.markdown.join("README.txt");
        std::fs::write(&notes, "keep me").unwrap();

        skills[2].name = "Rebasing".into();
        fx.write_yaml(&skills, 2_000);
        fx.engine().run().unwrap();

        assert!(!fx.markdown.join("advanced").join("interactive-rebase.md").exists());
        assert!(fx.markdown.join("advanced").join("rebasing.md").is_file());
        assert!(notes.is_file());
    }

    #[test]
    fn test_slug_collision_leaves_tree_untouched() {
        let fx = Fixture::new();
        let skills = corpus_fixture();
        fx.write_markdown(&skills, 1_000);

        let mut clashing = skills.clone();
        clashing.push(Skill::new("Git  basics", Level::Basic));
        fx.write_yaml(&clashing, 2_000);

        let err = fx.engine().run().unwrap_err();
        assert!(matches!(err, SyncError::SlugCollision { .. }));
        assert_eq!(fx.markdown_files().len(), 4);

        let lenient = fx
            .engine()
            .with_collision_policy(SlugCollisionPolicy::Warn)
            .run()
            .unwrap();
        assert_eq!(lenient.skills, 5);
        assert_eq!(fx.markdown_files().len(), 4);
    }

    // ── Forced operations ──────────────────────────────────────

    #[test]
    fn test_check_ignores_timestamps() {
        let fx = Fixture::new();
        let skills = corpus_fixture();
        fx.write_markdown(&skills, 1_000);
        fx.write_yaml(&skills, 5_000);

        let report = fx.engine().check().unwrap();
        assert_eq!(report.plan.action, SyncAction::Validate);
        assert_eq!(report.plan.reason, SyncReason::Requested);
        assert_eq!(mtime(&fx.yaml), FileTime::from_unix_time(5_000, 0));
    }

    #[test]
    fn test_check_requires_both_sides() {
        let fx = Fixture::new();
        yaml::save(&fx.yaml, &corpus_fixture()).unwrap();
        assert!(matches!(
            fx.engine().check().unwrap_err(),
            SyncError::InvalidCorpus(_)
        ));
        assert!(fx.markdown_files().is_empty());
    }

    #[test]
    fn test_forced_directions() {
        let fx = Fixture::new();
        let skills = corpus_fixture();
        fx.write_yaml(&skills, 1_000);

        let engine = fx.engine();
        let report = engine
            .execute(SyncPlan::requested(SyncAction::GenerateMarkdown))
            .unwrap();
        assert_eq!(report.written.len(), 4);

        std::fs::remove_file(&fx.yaml).unwrap();
        let report = engine.execute(SyncPlan::requested(SyncAction::GenerateYaml)).unwrap();
        assert_eq!(report.plan.reason, SyncReason::Requested);
        assert_eq!(yaml::load(&fx.yaml).unwrap(), skills);
    }

    #[test]
    fn test_forced_yaml_needs_markdown() {
        let fx = Fixture::new();
        let skills = corpus_fixture();
        fx.write_yaml(&skills, 1_000);
        let before = std::fs::read_to_string(&fx.yaml).unwrap();

        let err = fx
            .engine()
            .execute(SyncPlan::requested(SyncAction::GenerateYaml))
            .unwrap_err();
        assert!(matches!(err, SyncError::InvalidCorpus(_)));

        std::fs::create_dir_all(fx.markdown.join("basic")).unwrap();
        let err = fx
            .engine()
            .execute(SyncPlan::requested(SyncAction::GenerateYaml))
            .unwrap_err();
        assert!(matches!(err, SyncError::InvalidCorpus(_)));

        assert_eq!(std::fs::read_to_string(&fx.yaml).unwrap(), before);
        assert_eq!(mtime(&fx.yaml), FileTime::from_unix_time(1_000, 0));
    }

    #[test]
    fn test_from_config_uses_paths() {
        let fx = Fixture::new();
        let mut config = SyncConfig::default();
        config.paths.yaml = fx.yaml.clone();
        config.paths.markdown_dir = fx.markdown.clone();
        config.sync.mtime_threshold_ms = 250;

        let engine = SkillSync::from_config(&config);
        assert_eq!(engine.yaml_path(), fx.yaml.as_path());
        assert_eq!(engine.markdown_dir(), fx.markdown.as_path());
    }
}
