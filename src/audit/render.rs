//! Plain-text rendering of audit reports.

use crate::github::models::PermissionTier;

use super::report::{AuditReport, CollaboratorRecord};

const fn tier_label(tier: PermissionTier) -> &'static str {
    match tier {
        PermissionTier::Admin => "Admin",
        PermissionTier::Write => "Write",
        PermissionTier::Read => "Read",
    }
}

fn collaborator_line(collaborator: &CollaboratorRecord) -> String {
    if collaborator.teams.is_empty() {
        format!("\t\t\t{}", collaborator.login)
    } else {
        format!(
            "\t\t\t{login} (teams: {teams})",
            login = collaborator.login,
            teams = collaborator.teams.join(", ")
        )
    }
}

fn with_url(text: String, url: Option<&str>) -> String {
    match url {
        Some(url) => format!("{text} ({url})"),
        None => text,
    }
}

/// Renders a report as an indented text block terminated by `--` and a
/// blank line.
///
/// Reports with nothing noteworthy render as the empty string.
#[must_use]
pub fn render_report(report: &AuditReport) -> String {
    if !report.is_noteworthy() {
        return String::new();
    }

    let mut lines = vec![format!("{} ->", report.repository)];

    if report.collaborator_count > 1 {
        lines.push(format!("\tCollaborators ({}):", report.collaborator_count));
        for (tier, collaborators) in report.tiers() {
            lines.push(format!(
                "\t\t{label} ({count}):",
                label = tier_label(tier),
                count = collaborators.len()
            ));
            lines.extend(collaborators.iter().map(collaborator_line));
        }
    }

    if !report.deploy_keys.is_empty() {
        lines.push(format!("\tKeys ({}):", report.deploy_keys.len()));
        lines.extend(report.deploy_keys.iter().map(|key| {
            with_url(
                format!("\t\t{title} - ro:{ro}", title = key.title, ro = key.read_only),
                key.url.as_deref(),
            )
        }));
    }

    if !report.hooks.is_empty() {
        lines.push(format!("\tHooks ({}):", report.hooks.len()));
        lines.extend(report.hooks.iter().map(|hook| {
            with_url(
                format!("\t\t{name} - active:{active}", name = hook.name, active = hook.active),
                hook.url.as_deref(),
            )
        }));
    }

    if !report.protected_branches.is_empty() {
        lines.push(format!(
            "\tProtected Branches ({count}): {names}",
            count = report.protected_branches.len(),
            names = report.protected_branches.join(", ")
        ));
    }

    if !report.unprotected_branches.is_empty() {
        lines.push(format!(
            "\tUnprotected Branches ({count}): {names}",
            count = report.unprotected_branches.len(),
            names = report.unprotected_branches.join(", ")
        ));
    }

    let strategies = report.merge_strategies;
    let methods: String = [
        (strategies.merge_commit, " mergeCommit"),
        (strategies.squash, " squash"),
        (strategies.rebase, " rebase"),
    ]
    .iter()
    .filter(|(enabled, _)| *enabled)
    .map(|(_, name)| *name)
    .collect();
    lines.push(format!("\tMerge Methods:{methods}"));

    lines.push("--".to_owned());
    lines.push(String::new());
    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::render_report;
    use crate::audit::report::{AuditReport, CollaboratorRecord};
    use crate::github::locator::RepositoryRef;
    use crate::github::models::{DeployKey, MergeStrategies, PermissionTier, Webhook};

    #[fixture]
    fn quiet_report() -> AuditReport {
        AuditReport {
            repository: RepositoryRef::from_owner_repo("genuinetools", "audit")
                .expect("reference is valid"),
            collaborator_count: 1,
            admins: vec![CollaboratorRecord {
                login: "jessfraz".to_owned(),
                tier: PermissionTier::Admin,
                teams: Vec::new(),
            }],
            writers: Vec::new(),
            readers: Vec::new(),
            deploy_keys: Vec::new(),
            hooks: Vec::new(),
            protected_branches: Vec::new(),
            unprotected_branches: Vec::new(),
            branch_count: 0,
            merge_strategies: MergeStrategies::default(),
        }
    }

    #[rstest]
    fn quiet_repository_renders_nothing(quiet_report: AuditReport) {
        assert_eq!(render_report(&quiet_report), "");
    }

    #[rstest]
    fn renders_full_block(quiet_report: AuditReport) {
        let report = AuditReport {
            collaborator_count: 3,
            admins: vec![CollaboratorRecord {
                login: "jessfraz".to_owned(),
                tier: PermissionTier::Admin,
                teams: vec!["owners".to_owned(), "core".to_owned()],
            }],
            writers: vec![CollaboratorRecord {
                login: "octocat".to_owned(),
                tier: PermissionTier::Write,
                teams: Vec::new(),
            }],
            readers: vec![CollaboratorRecord {
                login: "hubot".to_owned(),
                tier: PermissionTier::Read,
                teams: Vec::new(),
            }],
            deploy_keys: vec![
                DeployKey {
                    title: "ci".to_owned(),
                    read_only: true,
                    url: Some("https://api.github.com/repos/genuinetools/audit/keys/1".to_owned()),
                },
                DeployKey {
                    title: "legacy".to_owned(),
                    read_only: false,
                    url: None,
                },
            ],
            hooks: vec![Webhook {
                name: "web".to_owned(),
                active: true,
                url: Some("https://ci.example.com/hook".to_owned()),
            }],
            protected_branches: vec!["main".to_owned(), "release/*".to_owned()],
            unprotected_branches: vec!["feature".to_owned()],
            branch_count: 3,
            merge_strategies: MergeStrategies {
                merge_commit: true,
                squash: true,
                rebase: false,
            },
            ..quiet_report
        };

        let expected = "genuinetools/audit ->\n\
            \tCollaborators (3):\n\
            \t\tAdmin (1):\n\
            \t\t\tjessfraz (teams: owners, core)\n\
            \t\tWrite (1):\n\
            \t\t\toctocat\n\
            \t\tRead (1):\n\
            \t\t\thubot\n\
            \tKeys (2):\n\
            \t\tci - ro:true (https://api.github.com/repos/genuinetools/audit/keys/1)\n\
            \t\tlegacy - ro:false\n\
            \tHooks (1):\n\
            \t\tweb - active:true (https://ci.example.com/hook)\n\
            \tProtected Branches (2): main, release/*\n\
            \tUnprotected Branches (1): feature\n\
            \tMerge Methods: mergeCommit squash\n\
            --\n\n";

        assert_eq!(render_report(&report), expected);
    }

    #[rstest]
    fn lone_collaborator_section_is_omitted(quiet_report: AuditReport) {
        let report = AuditReport {
            unprotected_branches: vec!["main".to_owned()],
            branch_count: 1,
            ..quiet_report
        };

        let rendered = render_report(&report);

        assert!(!rendered.contains("Collaborators"), "got {rendered:?}");
        assert!(rendered.starts_with("genuinetools/audit ->\n\tUnprotected Branches (1): main\n"));
        assert!(rendered.ends_with("\tMerge Methods:\n--\n\n"));
    }
}
