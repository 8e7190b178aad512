//! Operator-facing notices and the production approval summary

use super::tag::DiffTool;
use crate::config::ProjectInfo;

/// Build system named when a stage has no job identifier
const DEFAULT_BUILD_SYSTEM: &str = "Jenkins or GitLab CI";

/// Success notice after a non-production stage was pushed
pub fn stage_notice(stage: &str, job_identifier: Option<&str>) -> String {
    format!(
        "{stage} stage pushed. Trigger or follow the build in {}",
        job_identifier.unwrap_or(DEFAULT_BUILD_SYSTEM)
    )
}

/// Where reviewers find the release diff
pub fn diff_url(
    tool: DiffTool,
    project: &ProjectInfo,
    production_branch: &str,
    origin_branch: &str,
) -> String {
    match tool {
        DiffTool::Arc => format!(
            "Create the review diff with `arc diff origin/{production_branch} --only`"
        ),
        DiffTool::Compose => project.compare_url(production_branch, origin_branch),
    }
}

/// Rows of the approval form printed after a production tag is pushed
pub fn approval_rows(
    project: &ProjectInfo,
    job_identifier: Option<&str>,
    tag: &str,
    diff_url: &str,
) -> Vec<(&'static str, String)> {
    vec![
        ("git project", project.project_name.clone()),
        ("git url", project.project_url.clone()),
        ("job", job_identifier.unwrap_or("-").to_string()),
        ("tag", tag.to_string()),
        ("git diff", diff_url.to_string()),
    ]
}
