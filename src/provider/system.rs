use sysinfo::{Disks, Networks, Pid, ProcessesToUpdate, System};

use crate::config::{Config, Verbosity};
use crate::constants::*;
use crate::error::Result;
use crate::models::{Entry, PageSet};
use crate::provider::PageProvider;
use crate::utils::{format_bytes, format_duration, truncate_str};

/// Built-in provider describing the host machine and the target application.
/// Gathers data only; no analysis.
pub struct SystemPageProvider {
    sys: System,
    networks: Networks,
    disks: Disks,
    own_pid: Option<Pid>,
}

impl Default for SystemPageProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemPageProvider {
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        // CPU usage needs two samples to be meaningful
        std::thread::sleep(std::time::Duration::from_millis(INITIAL_SETTLE_MS));
        sys.refresh_all();

        Self {
            sys,
            networks: Networks::new_with_refreshed_list(),
            disks: Disks::new_with_refreshed_list(),
            own_pid: sysinfo::get_current_pid().ok(),
        }
    }

    fn refresh(&mut self) {
        self.sys.refresh_all();
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
        self.networks.refresh();
        self.disks.refresh();
    }

    fn add_application(&self, pages: &mut PageSet, config: &Config) {
        let page = pages.add_page("Application");
        page.add("App ID", config.app_id());
        page.add("Diagnostics version", env!("CARGO_PKG_VERSION"));
        page.add(
            "Generated at",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        );

        let own = self.own_pid.and_then(|pid| self.sys.process(pid));
        if let Some(pid) = self.own_pid {
            page.add("PID", pid.as_u32().to_string());
        }
        if let Some(proc_info) = own {
            page.add("Running for", format_duration(proc_info.run_time()));
            page.add("Memory", format_bytes(proc_info.memory()));
            if let Some(exe) = proc_info.exe() {
                page.add("Executable", exe.display().to_string());
            }
        }
        if let Ok(cwd) = std::env::current_dir() {
            page.add("Working directory", cwd.display().to_string());
        }

        let targets = self.target_processes(config.app_id());
        page.push(
            Entry::new("Running instances", targets.len().to_string()).with_category("target"),
        );

        if config.verbosity() >= Verbosity::Verbose {
            let args: Vec<String> = std::env::args().collect();
            page.add("Arguments", args.join(" "));
        }
    }

    fn add_system(&self, pages: &mut PageSet, config: &Config) {
        let load = System::load_average();
        let page = pages.add_page("System");
        page.add(
            "Hostname",
            System::host_name().unwrap_or_else(|| "unknown".into()),
        );
        page.add(
            "OS",
            format!(
                "{} {}",
                System::name().unwrap_or_else(|| "Unknown".into()),
                System::os_version().unwrap_or_default()
            ),
        );
        page.add("Architecture", std::env::consts::ARCH);
        page.add("Uptime", format_duration(System::uptime()));
        page.add(
            "Load average",
            format!("{:.2} {:.2} {:.2}", load.one, load.five, load.fifteen),
        );
        page.add("Processes", self.sys.processes().len().to_string());
        if config.verbosity() >= Verbosity::Verbose {
            page.add(
                "Kernel",
                System::kernel_version().unwrap_or_else(|| "unknown".into()),
            );
        }
    }

    fn add_cpu(&self, pages: &mut PageSet, config: &Config) {
        let cpus = self.sys.cpus();
        let page = pages.add_page("CPU");
        if let Some(first) = cpus.first() {
            page.add("Model", first.brand().trim());
            page.add("Frequency", format!("{} MHz", first.frequency()));
        }
        page.add("Cores", cpus.len().to_string());
        page.add("Usage", format!("{:.1}%", self.sys.global_cpu_usage()));
        if config.verbosity() >= Verbosity::Verbose {
            for cpu in cpus {
                let usage = format!("{:.1}%", cpu.cpu_usage());
                page.push(Entry::new(cpu.name(), usage).with_category("core"));
            }
        }
    }

    fn add_memory(&self, pages: &mut PageSet) {
        let total = self.sys.total_memory();
        let used = self.sys.used_memory();
        let percent = if total > 0 {
            used as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        let page = pages.add_page("Memory");
        page.add("Total", format_bytes(total));
        page.add("Used", format!("{} ({:.1}%)", format_bytes(used), percent));
        page.add("Available", format_bytes(self.sys.available_memory()));
        page.add(
            "Swap",
            format!(
                "{} / {}",
                format_bytes(self.sys.used_swap()),
                format_bytes(self.sys.total_swap())
            ),
        );
    }

    fn add_disks(&self, pages: &mut PageSet) {
        let page = pages.add_page("Disks");
        let mut disks: Vec<_> = self
            .disks
            .list()
            .iter()
            .filter(|d| d.total_space() >= MIN_DISK_SIZE_BYTES)
            .collect();
        disks.sort_by(|a, b| a.mount_point().cmp(b.mount_point()));
        for d in disks {
            page.push(
                Entry::new(
                    d.mount_point().to_string_lossy(),
                    format!(
                        "{} free of {} ({})",
                        format_bytes(d.available_space()),
                        format_bytes(d.total_space()),
                        d.file_system().to_string_lossy()
                    ),
                )
                .with_category("disk"),
            );
        }
    }

    fn add_network(&self, pages: &mut PageSet) {
        let page = pages.add_page("Network");
        let mut interfaces: Vec<_> = self.networks.iter().collect();
        interfaces.sort_by(|a, b| a.0.cmp(b.0));
        for (name, data) in interfaces {
            page.push(
                Entry::new(
                    name.as_str(),
                    format!(
                        "rx {} / tx {}",
                        format_bytes(data.total_received()),
                        format_bytes(data.total_transmitted())
                    ),
                )
                .with_category("interface"),
            );
        }
    }

    fn add_processes(&self, pages: &mut PageSet, config: &Config) {
        let mut procs: Vec<_> = self.sys.processes().values().collect();
        procs.sort_by(|a, b| {
            b.memory()
                .cmp(&a.memory())
                .then_with(|| a.pid().as_u32().cmp(&b.pid().as_u32()))
        });

        let page = pages.add_page("Processes");
        for proc_info in procs.into_iter().take(config.max_processes()) {
            let label = format!(
                "{} ({})",
                proc_info.name().to_string_lossy(),
                proc_info.pid().as_u32()
            );
            let mut value = format!(
                "{:.1}% cpu, {}",
                proc_info.cpu_usage(),
                format_bytes(proc_info.memory())
            );
            if config.verbosity() >= Verbosity::Verbose {
                let cmd: Vec<String> = proc_info
                    .cmd()
                    .iter()
                    .map(|s| s.to_string_lossy().to_string())
                    .collect();
                if !cmd.is_empty() {
                    value.push_str(", ");
                    value.push_str(&truncate_str(&cmd.join(" "), MAX_CMD_LEN));
                }
            }
            page.push(Entry::new(label, value).with_category("process"));
        }
    }

    fn add_environment(&self, pages: &mut PageSet, config: &Config) {
        let mut vars: Vec<(String, String)> = std::env::vars().collect();
        vars.sort();
        let page = pages.add_page("Environment");
        for (name, value) in vars {
            let shown = if config.should_redact(&name) {
                REDACTED.to_string()
            } else {
                value
            };
            page.push(Entry::new(name, shown).with_category("env"));
        }
    }

    /// Processes whose name equals `app_id`, excluding ourselves.
    fn target_processes(&self, app_id: &str) -> Vec<Pid> {
        self.sys
            .processes()
            .iter()
            .filter(|(pid, p)| {
                Some(**pid) != self.own_pid && p.name().to_string_lossy() == app_id
            })
            .map(|(pid, _)| *pid)
            .collect()
    }
}

impl PageProvider for SystemPageProvider {
    fn populate(&mut self, mut pages: PageSet, config: &Config) -> Result<PageSet> {
        self.refresh();

        self.add_application(&mut pages, config);
        self.add_system(&mut pages, config);
        self.add_memory(&mut pages);
        if config.verbosity() >= Verbosity::Normal {
            self.add_cpu(&mut pages, config);
            self.add_disks(&mut pages);
            self.add_network(&mut pages);
        }
        if config.include_processes() {
            self.add_processes(&mut pages, config);
        }
        if config.include_environment() {
            self.add_environment(&mut pages, config);
        }
        Ok(pages)
    }
}
