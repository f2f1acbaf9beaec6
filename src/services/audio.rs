//! Audio playback through the platform's command-line player

use std::{
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use tokio::{
    process::{Child, Command},
    sync::oneshot,
    task::JoinHandle,
    time::sleep,
};
use tracing::{debug, info, warn};

use crate::state::{EndSound, StopMode};

/// Volume steps of an ambient fade-out
const FADE_STEPS: u32 = 5;
const FADE_STEP_INTERVAL: Duration = Duration::from_millis(200);

/// Command-line audio player available on this system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    /// macOS `afplay`
    Afplay,
    /// PulseAudio / PipeWire `paplay`
    Paplay,
    /// ALSA `aplay`, no volume control
    Aplay,
}

impl PlayerKind {
    pub fn program(&self) -> &'static str {
        match self {
            PlayerKind::Afplay => "afplay",
            PlayerKind::Paplay => "paplay",
            PlayerKind::Aplay => "aplay",
        }
    }

    /// Arguments to play `path` once at `volume` in [0, 1]
    pub fn args(&self, path: &Path, volume: f32) -> Vec<String> {
        let file = path.to_string_lossy().into_owned();
        match self {
            PlayerKind::Afplay => vec!["-v".to_string(), format!("{:.2}", volume), file],
            PlayerKind::Paplay => vec![format!("--volume={}", pulse_volume(volume)), file],
            PlayerKind::Aplay => vec!["-q".to_string(), file],
        }
    }

    fn command(&self, path: &Path, volume: f32) -> Command {
        let mut command = Command::new(self.program());
        command
            .args(self.args(path, volume))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        command
    }
}

/// PulseAudio raw volume, 65536 is 100%
fn pulse_volume(volume: f32) -> u32 {
    (volume.clamp(0.0, 1.0) * 65536.0).round() as u32
}

/// Decreasing raw volumes for a fade-out from `volume`, ending at silence
pub fn fade_levels(volume: f32, steps: u32) -> Vec<u32> {
    let start = pulse_volume(volume) as u64;
    let steps = steps.max(1);
    (1..=steps)
        .map(|step| (start * u64::from(steps - step) / u64::from(steps)) as u32)
        .collect()
}

/// Index of the PulseAudio sink input owned by `pid` in `pactl list sink-inputs` output
pub fn sink_input_for_pid(listing: &str, pid: u32) -> Option<u32> {
    let pid = pid.to_string();
    let mut current = None;

    for line in listing.lines().map(str::trim) {
        if let Some(index) = line.strip_prefix("Sink Input #") {
            current = index.trim().parse().ok();
        } else if let Some(value) = line.strip_prefix("application.process.id = ") {
            if value.trim_matches('"') == pid {
                return current;
            }
        }
    }

    None
}

async fn find_sink_input(pid: u32) -> Result<Option<u32>, String> {
    let output = Command::new("pactl")
        .env("LC_ALL", "C")
        .args(["list", "sink-inputs"])
        .stderr(Stdio::null())
        .output()
        .await
        .map_err(|e| format!("Failed to execute pactl: {}", e))?;

    if !output.status.success() {
        return Err(format!("pactl list failed: {}", output.status));
    }

    Ok(sink_input_for_pid(&String::from_utf8_lossy(&output.stdout), pid))
}

/// Step the volume of a running paplay stream down to silence
async fn fade_out(kind: PlayerKind, child: &Child, volume: f32) -> Result<(), String> {
    if kind != PlayerKind::Paplay {
        return Err(format!("{} cannot change volume mid-track", kind.program()));
    }

    let pid = child.id().ok_or("Ambient player already exited")?;
    let index = find_sink_input(pid)
        .await?
        .ok_or_else(|| format!("No sink input for pid {}", pid))?;

    for level in fade_levels(volume, FADE_STEPS) {
        let status = Command::new("pactl")
            .args(["set-sink-input-volume", &index.to_string(), &level.to_string()])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| format!("Failed to execute pactl: {}", e))?;

        if !status.success() {
            return Err(format!("pactl set-sink-input-volume failed: {}", status));
        }
        sleep(FADE_STEP_INTERVAL).await;
    }

    Ok(())
}

/// Find a usable player. Errors are reported but not fatal to the caller.
pub async fn check_player_available() -> Result<PlayerKind, String> {
    if cfg!(target_os = "macos") {
        info!("Using afplay for audio");
        return Ok(PlayerKind::Afplay);
    }

    for kind in [PlayerKind::Paplay, PlayerKind::Aplay] {
        let version = Command::new(kind.program())
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        if version.is_ok() {
            info!("Using {} for audio", kind.program());
            return Ok(kind);
        }
    }

    Err("No audio player found (tried paplay, aplay). Sounds are disabled.".to_string())
}

/// Play a file once and wait for the player to exit
pub async fn play_file(kind: PlayerKind, path: &Path, volume: f32) -> Result<(), String> {
    debug!("Playing {} with {}", path.display(), kind.program());

    if !path.exists() {
        return Err(format!("Sound file not found: {}", path.display()));
    }

    let status = kind
        .command(path, volume)
        .status()
        .await
        .map_err(|e| format!("Failed to execute {}: {}", kind.program(), e))?;

    if !status.success() {
        return Err(format!("{} failed: {}", kind.program(), status));
    }

    Ok(())
}

/// Replay `path` until `stop` fires or its sender is dropped
async fn ambient_loop(
    kind: PlayerKind,
    path: PathBuf,
    volume: f32,
    mut stop: oneshot::Receiver<StopMode>,
) {
    loop {
        let mut child = match kind.command(&path, volume).spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to start ambient sound with {}: {}", kind.program(), e);
                return;
            }
        };

        tokio::select! {
            status = child.wait() => match status {
                Ok(status) if status.success() => debug!("Ambient track finished, looping"),
                Ok(status) => {
                    warn!("Ambient player exited with {}, giving up", status);
                    return;
                }
                Err(e) => {
                    warn!("Failed to wait for ambient player: {}", e);
                    return;
                }
            },
            mode = &mut stop => {
                if matches!(mode, Ok(StopMode::Fade)) {
                    if let Err(e) = fade_out(kind, &child, volume).await {
                        debug!("Fade skipped, stopping immediately: {}", e);
                    }
                }
                if let Err(e) = child.kill().await {
                    debug!("Ambient player already gone: {}", e);
                }
                return;
            }
        }
    }
}

struct AmbientLoop {
    stop: oneshot::Sender<StopMode>,
    handle: JoinHandle<()>,
}

/// Single-track ambient loop plus one-shot chimes
pub struct AudioPlayer {
    player: Option<PlayerKind>,
    ambient_track: Option<PathBuf>,
    ambient: Option<AmbientLoop>,
}

impl AudioPlayer {
    pub fn new(player: Option<PlayerKind>, ambient_track: Option<PathBuf>) -> Self {
        Self {
            player,
            ambient_track,
            ambient: None,
        }
    }

    pub fn is_ambient_playing(&self) -> bool {
        self.ambient
            .as_ref()
            .is_some_and(|ambient| !ambient.handle.is_finished())
    }

    /// Start looping the ambient track. No-op if already playing or unconfigured.
    pub fn start_ambient(&mut self, volume: f32) {
        if self.is_ambient_playing() {
            return;
        }
        let (Some(kind), Some(track)) = (self.player, self.ambient_track.clone()) else {
            return;
        };
        if !track.exists() {
            warn!("Ambient track not found: {}", track.display());
            return;
        }

        info!("Starting ambient sound at volume {:.2}", volume);
        let (stop, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(ambient_loop(kind, track, volume, stop_rx));
        self.ambient = Some(AmbientLoop { stop, handle });
    }

    pub fn stop_ambient(&mut self, mode: StopMode) {
        let Some(ambient) = self.ambient.take() else {
            return;
        };

        info!("Stopping ambient sound ({:?})", mode);
        if ambient.stop.send(mode).is_err() {
            debug!("Ambient loop already finished");
        }
    }

    /// Play the end-of-session chime in the background
    pub fn play_chime(&self, sound: EndSound, volume: f32) {
        let (Some(kind), Some(path)) = (self.player, sound.path()) else {
            return;
        };

        tokio::spawn(async move {
            if let Err(e) = play_file(kind, &path, volume).await {
                warn!("Failed to play {} chime: {}", sound, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_args() {
        let path = Path::new("/tmp/rain.wav");

        assert_eq!(
            PlayerKind::Afplay.args(path, 0.5),
            vec!["-v", "0.50", "/tmp/rain.wav"]
        );
        assert_eq!(
            PlayerKind::Paplay.args(path, 0.5),
            vec!["--volume=32768", "/tmp/rain.wav"]
        );
        assert_eq!(PlayerKind::Paplay.args(path, 2.0)[0], "--volume=65536");
        assert_eq!(PlayerKind::Aplay.args(path, 0.5), vec!["-q", "/tmp/rain.wav"]);
    }

    #[test]
    fn test_fade_levels() {
        assert_eq!(fade_levels(1.0, 4), vec![49152, 32768, 16384, 0]);
        assert_eq!(fade_levels(0.5, 2), vec![16384, 0]);
        assert_eq!(fade_levels(0.0, 3), vec![0, 0, 0]);
        assert_eq!(fade_levels(0.5, 0), vec![0]);
    }

    #[test]
    fn test_sink_input_lookup() {
        let listing = r#"Sink Input #41
	Driver: protocol-native.c
	Properties:
		application.name = "Firefox"
		application.process.id = "2210"
Sink Input #57
	Driver: protocol-native.c
	Properties:
		application.name = "paplay"
		application.process.id = "31337"
"#;

        assert_eq!(sink_input_for_pid(listing, 31337), Some(57));
        assert_eq!(sink_input_for_pid(listing, 2210), Some(41));
        assert_eq!(sink_input_for_pid(listing, 1), None);
        assert_eq!(sink_input_for_pid("", 31337), None);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let err = play_file(PlayerKind::Aplay, Path::new("/nonexistent/cherry.wav"), 1.0)
            .await
            .unwrap_err();
        assert!(err.contains("not found"));
    }

    #[tokio::test]
    async fn test_unconfigured_ambient_is_silent() {
        let mut audio = AudioPlayer::new(Some(PlayerKind::Aplay), None);
        audio.start_ambient(0.5);
        assert!(!audio.is_ambient_playing());
        audio.stop_ambient(StopMode::Fade);

        let mut audio = AudioPlayer::new(None, Some(PathBuf::from("/tmp/rain.wav")));
        audio.start_ambient(0.5);
        assert!(!audio.is_ambient_playing());
    }
}
