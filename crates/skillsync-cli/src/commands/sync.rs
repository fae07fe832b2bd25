use console::style;
use std::path::Path;

use skillsync_config::SyncConfig;
use skillsync_skills::slug::skill_filename;
use skillsync_skills::{SkillSync, SyncAction, SyncPlan, SyncReason, SyncReport};

pub(super) fn cmd_sync(config: &SyncConfig) -> skillsync_core::Result<()> {
    let engine = SkillSync::from_config(config);
    let plan = engine.plan()?;
    announce(&plan);
    let report = engine.execute(plan)?;
    print_summary(&engine, &report);
    Ok(())
}

pub(super) fn cmd_check(config: &SyncConfig) -> skillsync_core::Result<()> {
    let engine = SkillSync::from_config(config);
    announce(&SyncPlan::requested(SyncAction::Validate));
    let report = engine.check()?;
    print_summary(&engine, &report);
    Ok(())
}

pub(super) fn cmd_force(config: &SyncConfig, action: SyncAction) -> skillsync_core::Result<()> {
    let engine = SkillSync::from_config(config);
    let plan = SyncPlan::requested(action);
    announce(&plan);
    let report = engine.execute(plan)?;
    print_summary(&engine, &report);
    Ok(())
}

pub(super) fn cmd_slug(name: &str) -> skillsync_core::Result<()> {
    println!("{}", skill_filename(name));
    Ok(())
}

fn announce(plan: &SyncPlan) {
    let icon = match plan.action {
        SyncAction::Validate => "🔍",
        SyncAction::GenerateYaml | SyncAction::GenerateMarkdown => "📝",
    };
    println!("{icon} {}", style(plan.headline()).bold());
}

fn print_summary(engine: &SkillSync, report: &SyncReport) {
    match report.plan.action {
        SyncAction::Validate => {
            bullet(format!("Checked {} skills", report.skills));
            bullet("No differences found");
            done("Already in sync".to_string());
        }
        SyncAction::GenerateYaml => {
            bullet(format!("Processed {} skills", report.skills));
            bullet(format!("Generated {}", engine.yaml_path().display()));
            done(generated_yaml_message(report, engine.yaml_path()));
        }
        SyncAction::GenerateMarkdown => {
            bullet(format!("Processed {} skills", report.skills));
            done(generated_markdown_message(report, engine.markdown_dir()));
        }
    }
}

fn generated_yaml_message(report: &SyncReport, yaml: &Path) -> String {
    if report.plan.reason == SyncReason::MarkdownNewer {
        "YAML updated".to_string()
    } else {
        format!("Generated {}", yaml.display())
    }
}

fn generated_markdown_message(report: &SyncReport, dir: &Path) -> String {
    if report.plan.reason == SyncReason::YamlNewer {
        "Markdown files updated".to_string()
    } else {
        format!("Generated markdown files in {}/", dir.display())
    }
}

fn bullet(text: impl std::fmt::Display) {
    println!("   • {text}");
}

fn done(text: String) {
    println!("{} {}", style("✅").green(), style(text).green());
}
