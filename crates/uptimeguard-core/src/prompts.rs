//! Dialog texts.

use indoc::formatdoc;
use std::path::Path;

use crate::config::Config;
use crate::notifier::{Dialog, WindowStyle};

pub const RESTART_NOW: &str = "Restart Now";
pub const DEFER: &str = "Defer";

/// Format seconds as `mm:ss`.
pub fn format_countdown(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn base(cfg: &Config, icon: &Path, style: WindowStyle, heading: &str, description: String) -> Dialog {
    Dialog {
        style,
        title: cfg.title.clone(),
        heading: heading.to_string(),
        description,
        button1: "OK".to_string(),
        button2: None,
        default_button: 1,
        icon: icon.to_path_buf(),
        timeout_secs: cfg.prompt_timeout_secs,
        cancellable: true,
    }
}

/// Two-button prompt offered while deferrals remain. Button 1 restarts, button 2 defers.
pub fn offer_choice(cfg: &Config, icon: &Path, uptime_days: u64, remaining: u32) -> Dialog {
    let description = formatdoc! {"
        Your computer has not been restarted in {uptime_days} days. Regular restarts
        keep it secure and running smoothly.

        Restart now, or defer until later. Deferrals remaining: {remaining}."};
    Dialog {
        button1: RESTART_NOW.to_string(),
        button2: Some(DEFER.to_string()),
        default_button: 2,
        ..base(cfg, icon, WindowStyle::Utility, "Restart required", description)
    }
}

pub fn defer_confirmation(cfg: &Config, icon: &Path, remaining: u32) -> Dialog {
    let description = if remaining == 0 {
        formatdoc! {"
            Restart deferred. You have no deferrals left: next time the restart
            will happen automatically after a short countdown."}
    } else {
        formatdoc! {"
            Restart deferred. You will be reminded again later.
            Deferrals remaining: {remaining}."}
    };
    base(cfg, icon, WindowStyle::Utility, "Restart deferred", description)
}

/// One tick of the forced countdown; `remaining_secs` must be computed fresh for every tick.
pub fn countdown(
    cfg: &Config,
    icon: &Path,
    uptime_days: u64,
    remaining_secs: u64,
    tick_timeout_secs: u64,
) -> Dialog {
    let description = formatdoc! {"
        Your computer has not been restarted in {uptime_days} days and all {limit}
        deferrals have been used.

        It will restart automatically in {left}.",
        limit = cfg.defer_limit,
        left = format_countdown(remaining_secs),
    };
    Dialog {
        button1: RESTART_NOW.to_string(),
        timeout_secs: tick_timeout_secs,
        cancellable: false,
        ..base(cfg, icon, WindowStyle::Hud, "Restart required", description)
    }
}

pub fn save_prompt(cfg: &Config, icon: &Path) -> Dialog {
    let description = formatdoc! {"
        Your computer will restart automatically in {grace}.
        Save your work now, or click Restart to continue immediately.",
        grace = format_countdown(cfg.save_grace_secs),
    };
    Dialog {
        button1: "Restart".to_string(),
        timeout_secs: cfg.save_grace_secs,
        cancellable: false,
        ..base(cfg, icon, WindowStyle::Hud, "Save your work", description)
    }
}

pub fn restart_failed(cfg: &Config, icon: &Path) -> Dialog {
    let description = formatdoc! {"
        Your computer could not be restarted automatically.
        Please restart it yourself or contact {contact}.",
        contact = cfg.support_contact,
    };
    base(cfg, icon, WindowStyle::Utility, "Restart failed", description)
}

pub fn uptime_unavailable(cfg: &Config, icon: &Path) -> Dialog {
    let description = formatdoc! {"
        The time since the last restart could not be determined.
        Please contact {contact}.",
        contact = cfg.support_contact,
    };
    base(cfg, icon, WindowStyle::Utility, "Uptime check failed", description)
}
