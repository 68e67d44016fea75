use crate::reporting::model::ResultSet;

/// Shell and terminal noise left out of the report
pub const IGNORED_VARS: &[&str] = &[
    "TERM",
    "SHELL",
    "HISTSIZE",
    "HISTCONTROL",
    "SSH_TTY",
    "LC_ALL",
    "LANG",
    "MAIL",
    "SHLVL",
    "XDG_RUNTIME_DIR",
    "XDG_SESSION_ID",
    "LS_COLORS",
];

/// Snapshot of the process environment
pub fn current() -> Vec<(String, String)> {
    std::env::vars_os()
        .map(|(k, v)| {
            (
                k.to_string_lossy().to_string(),
                v.to_string_lossy().to_string(),
            )
        })
        .collect()
}

pub fn collect<I>(vars: I) -> ResultSet
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter(|(name, _)| !IGNORED_VARS.contains(&name.as_str()))
        .collect()
}
