//! External player launching

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::Sender;
use std::thread;

use crate::config::AppConfig;
use crate::models::Channel;
use crate::session::TaskResult;

/// Build the command line for the configured player
pub fn player_command(config: &AppConfig, channel: &Channel) -> Command {
    let player = config.external_player.trim();
    let player_lower = player.to_lowercase();
    let mut cmd = Command::new(player);

    if player_lower.contains("mpv") {
        cmd.arg(format!("--force-media-title={}", channel.name));
        if config.pass_user_agent_to_player {
            cmd.arg(format!("--user-agent={}", config.user_agent));
        }
        cmd.arg(&channel.url);
    } else if player_lower.contains("vlc") {
        cmd.arg(&channel.url);
        cmd.arg(format!("--meta-title={}", channel.name));
        cmd.arg("--http-reconnect");
        if config.pass_user_agent_to_player {
            cmd.arg(format!(":http-user-agent={}", config.user_agent));
        }
    } else {
        // Generic player - just pass URL
        cmd.arg(&channel.url);
    }

    cmd.env("USER_AGENT", &config.user_agent);
    cmd.stdout(Stdio::null());
    cmd.stderr(Stdio::piped());
    cmd
}

/// Spawn the player and forward its stderr lines to `sender`
pub fn launch(config: &AppConfig, channel: &Channel, sender: Sender<TaskResult>) -> std::io::Result<Child> {
    let mut child = player_command(config, channel).spawn()?;

    if let Some(stderr) = child.stderr.take() {
        thread::spawn(move || {
            let reader = BufReader::new(stderr);
            for line in reader.lines().map_while(Result::ok) {
                if !line.trim().is_empty() && sender.send(TaskResult::PlayerLog(line)).is_err() {
                    break;
                }
            }
        });
    }

    Ok(child)
}
