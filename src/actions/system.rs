use std::process::Command;

use sysinfo::{Pid, ProcessesToUpdate, Signal, System};

use crate::actions::DeviceActions;
use crate::config::ActionCommands;
use crate::error::{HoodError, Result};
use crate::utils::{format_bytes, format_duration};

/// Reference device actions for a desktop host.
///
/// App info and kill act on processes named like the app id (never on
/// ourselves). Uninstall and clear-data run the command hooks from the
/// config's `[actions]` table, with `{app_id}` substituted.
pub struct SystemActions {
    sys: System,
    commands: ActionCommands,
    own_pid: Option<Pid>,
}

impl SystemActions {
    pub fn new(commands: ActionCommands) -> Self {
        Self {
            sys: System::new(),
            commands,
            own_pid: sysinfo::get_current_pid().ok(),
        }
    }

    fn matching_pids(&mut self, app_id: &str) -> Vec<Pid> {
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
        let mut pids: Vec<Pid> = self
            .sys
            .processes()
            .iter()
            .filter(|(pid, p)| {
                Some(**pid) != self.own_pid && p.name().to_string_lossy() == app_id
            })
            .map(|(pid, _)| *pid)
            .collect();
        pids.sort_by_key(|pid| pid.as_u32());
        pids
    }

    fn run_hook(&self, action: &str, hook: Option<&String>, app_id: &str) -> Result<String> {
        let Some(template) = hook else {
            return Ok(format!("No {} command configured for {}", action, app_id));
        };
        let command = expand_hook(template, app_id);
        tracing::info!(action, %command, "running action hook");
        let output = Command::new("sh").arg("-c").arg(&command).output()?;
        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let first_line = stdout.lines().next().unwrap_or("").trim();
            if first_line.is_empty() {
                Ok(format!("{} done for {}", action, app_id))
            } else {
                Ok(first_line.to_string())
            }
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(HoodError::Action {
                action: action.to_string(),
                reason: format!("{} ({})", output.status, stderr.trim()),
            })
        }
    }
}

/// Substitute `{app_id}` in a command hook.
pub fn expand_hook(template: &str, app_id: &str) -> String {
    template.replace("{app_id}", app_id)
}

impl DeviceActions for SystemActions {
    fn open_app_info(&mut self, app_id: &str) -> Result<String> {
        if self.commands.app_info.is_some() {
            let hook = self.commands.app_info.clone();
            return self.run_hook("app-info", hook.as_ref(), app_id);
        }
        let pids = self.matching_pids(app_id);
        let Some(first) = pids.first().and_then(|pid| self.sys.process(*pid)) else {
            return Ok(format!("{} is not running", app_id));
        };
        let total_mem: u64 = pids
            .iter()
            .filter_map(|pid| self.sys.process(*pid))
            .map(|p| p.memory())
            .sum();
        Ok(format!(
            "{}: {} instance(s), PID {}, up {}, {} total",
            app_id,
            pids.len(),
            first.pid().as_u32(),
            format_duration(first.run_time()),
            format_bytes(total_mem)
        ))
    }

    fn request_uninstall(&mut self, app_id: &str) -> Result<String> {
        let hook = self.commands.uninstall.clone();
        self.run_hook("uninstall", hook.as_ref(), app_id)
    }

    fn kill_background_processes(&mut self, app_id: &str) -> Result<String> {
        let pids = self.matching_pids(app_id);
        if pids.is_empty() {
            return Ok(format!("No {} processes to kill", app_id));
        }
        let mut signalled = 0usize;
        for pid in &pids {
            if let Some(process) = self.sys.process(*pid) {
                if process.kill_with(Signal::Term).unwrap_or(false) {
                    signalled += 1;
                } else {
                    tracing::warn!(pid = pid.as_u32(), "failed to send SIGTERM");
                }
            }
        }
        Ok(format!(
            "Sent SIGTERM to {}/{} {} processes",
            signalled,
            pids.len(),
            app_id
        ))
    }

    fn clear_app_data(&mut self, app_id: &str) -> Result<String> {
        let hook = self.commands.clear_data.clone();
        self.run_hook("clear-data", hook.as_ref(), app_id)
    }
}
