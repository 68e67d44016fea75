use crate::reporting::model::{EnvType, HostIdentity};
use std::path::Path;

const CGROUP_MARKERS: &[&str] = &["docker", "kubepods", "containerd", "lxc"];

pub fn detect() -> HostIdentity {
    let hostname = hostname::get()
        .ok()
        .map(|h| h.to_string_lossy().to_string())
        .filter(|h| !h.is_empty());

    let cgroup = std::fs::read_to_string("/proc/1/cgroup").ok();
    let env_type = classify(cgroup.as_deref(), Path::new("/.dockerenv").exists());

    tracing::debug!("Host {:?} looks like a {}", hostname, env_type);

    HostIdentity { hostname, env_type }
}

/// Container if PID 1's cgroup names a container runtime or a docker marker
/// file is present
pub fn classify(cgroup: Option<&str>, dockerenv: bool) -> EnvType {
    let in_cgroup = cgroup
        .map(|c| CGROUP_MARKERS.iter().any(|m| c.contains(m)))
        .unwrap_or(false);

    if in_cgroup || dockerenv {
        EnvType::Container
    } else {
        EnvType::Vm
    }
}
