/// Error code registry for stage-release
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 2000-2999: Workflow errors (cancellation, missing branches, conflicts)
/// - 3000-3999: Repository errors
/// - 4000-4999: Merge request gateway errors
/// - 5000-5999: Interaction errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_MISSING_REQUIRED: u16 = 1002;
    pub const CONFIG_INVALID: u16 = 1003;

    // Workflow errors (2000-2999)
    pub const WORKFLOW_CANCELLED: u16 = 2001;
    pub const WORKFLOW_BRANCH_NOT_FOUND_REMOTE: u16 = 2002;
    pub const WORKFLOW_MERGE_CONFLICT: u16 = 2003;

    // Repository errors (3000-3999)
    pub const GIT_GENERIC: u16 = 3000;
    pub const GIT_NOT_REPO: u16 = 3001;
    pub const GIT_DETACHED_HEAD: u16 = 3002;
    pub const GIT_NO_UPSTREAM: u16 = 3003;
    pub const GIT_MERGE_CONFLICT: u16 = 3004;
    pub const GIT_COMMAND_FAILED: u16 = 3005;
    pub const GIT_PROCESS: u16 = 3006;

    // Gateway errors (4000-4999)
    pub const GATEWAY_GENERIC: u16 = 4000;
    pub const GATEWAY_UNAUTHORIZED: u16 = 4001;
    pub const GATEWAY_TIMEOUT: u16 = 4002;
    pub const GATEWAY_BAD_RESPONSE: u16 = 4003;

    // Interaction errors (5000-5999)
    pub const PROMPT_GENERIC: u16 = 5000;
    pub const PROMPT_TIMEOUT: u16 = 5001;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        1001 => "Configuration file not found",
        1002 => "Required configuration field is missing",
        1003 => "Configuration could not be parsed",

        2001 => "Release cancelled by the operator",
        2002 => "Target branch does not exist on the remote",
        2003 => "Automatic merge failed",

        3000 => "Generic repository error",
        3001 => "Not a git repository",
        3002 => "Repository is in detached HEAD state",
        3003 => "Current branch has no upstream",
        3004 => "Git merge conflict",
        3005 => "Git command failed",
        3006 => "Failed to run git",

        4000 => "Merge request query failed",
        4001 => "Code host rejected the access token",
        4002 => "Merge request query timed out",
        4003 => "Code host returned an unexpected response",

        5000 => "Prompt failed",
        5001 => "Prompt timed out",

        _ => "Unknown error code",
    }
}
