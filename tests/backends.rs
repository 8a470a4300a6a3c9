#![cfg(unix)]

//! Runs the real adapters against shell scripts that mimic each tool's
//! command line and output layout. Everything lives in one test so no other
//! test thread forks while a script is still open for writing.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use stem_harness::{
    load_config_from, read_audio, run_all, run_backend, write_audio, AudioData, BackendKind,
    HarnessError,
};
use tempfile::tempdir;

const FAKE_SPLEETER: &str = r#"#!/bin/sh
out=""; input=""
while [ $# -gt 0 ]; do
  case "$1" in
    separate) shift ;;
    -p) shift 2 ;;
    -o) out="$2"; shift 2 ;;
    *) input="$1"; shift ;;
  esac
done
name=$(basename "$input" .wav)
mkdir -p "$out/$name"
for s in vocals accompaniment; do cp "$input" "$out/$name/$s.wav"; done
"#;

const FAKE_DEMUCS: &str = r#"#!/bin/sh
out=""; model=""; input=""
while [ $# -gt 0 ]; do
  case "$1" in
    -n) model="$2"; shift 2 ;;
    -o) out="$2"; shift 2 ;;
    *) input="$1"; shift ;;
  esac
done
name=$(basename "$input" .wav)
mkdir -p "$out/$model/$name"
for s in drums bass other vocals; do cp "$input" "$out/$model/$name/$s.wav"; done
"#;

const FAKE_UMX: &str = r#"#!/bin/sh
out=""; input=""
while [ $# -gt 0 ]; do
  case "$1" in
    --outdir) out="$2"; shift 2 ;;
    --model) shift 2 ;;
    *) input="$1"; shift ;;
  esac
done
name=$(basename "$input" .wav)
mkdir -p "$out/$name"
for s in vocals drums bass other; do cp "$input" "$out/$name/$s.wav"; done
"#;

const FAILING_TOOL: &str = "#!/bin/sh\necho 'model weights missing' >&2\nexit 3\n";

const SILENT_TOOL: &str = "#!/bin/sh\nexit 0\n";

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn write_config(dir: &Path, value: serde_json::Value) -> PathBuf {
    let path = dir.join("config.json");
    fs::write(&path, value.to_string()).unwrap();
    path
}

fn wav_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn adapters_drive_command_line_tools() {
    let tmp = tempdir().unwrap();
    let bin = tmp.path().join("bin");
    let in_dir = tmp.path().join("in");
    let out_dir = tmp.path().join("out");
    fs::create_dir_all(&bin).unwrap();
    fs::create_dir_all(&in_dir).unwrap();

    let spleeter = script(&bin, "spleeter", FAKE_SPLEETER);
    let demucs = script(&bin, "demucs", FAKE_DEMUCS);
    let umx = script(&bin, "umx", FAKE_UMX);
    let failing = script(&bin, "failing", FAILING_TOOL);
    let silent = script(&bin, "silent", SILENT_TOOL);

    // Half a second of mono at 22.05 kHz.
    let frames = 11_025;
    write_audio(
        in_dir.join("Missy.wav"),
        &AudioData {
            samples: (0..frames).map(|i| (i as f32 * 0.03).sin() * 0.3).collect(),
            sample_rate: 22_050,
            channels: 1,
        },
    )
    .unwrap();

    let cfg = load_config_from(write_config(
        tmp.path(),
        serde_json::json!({
            "input_dir": in_dir,
            "output_dir": out_dir,
            "input_file": "Missy.wav",
            "spleeter": {"program": spleeter, "stems": 2},
            "demucs": {"program": demucs, "model": "htdemucs"},
            "openunmix": {"program": umx},
        }),
    ))
    .unwrap();

    // Spleeter: stereo, resampled to 44.1 kHz on load, two stems.
    let report = run_backend(BackendKind::Spleeter, &cfg).unwrap();
    assert_eq!(report.stems, vec!["accompaniment", "vocals"]);
    let spleeter_out = out_dir.join("output_spleeter");
    assert_eq!(wav_names(&spleeter_out), vec!["accompaniment.wav", "vocals.wav"]);
    let vocals = read_audio(spleeter_out.join("vocals.wav")).unwrap();
    assert_eq!(vocals.channels, 2);
    assert_eq!(vocals.sample_rate, 44_100);

    // Demucs: nested <model>/<track>/ layout, native (model) rate on save.
    let report = run_backend(BackendKind::Demucs, &cfg).unwrap();
    assert_eq!(report.stems, vec!["bass", "drums", "other", "vocals"]);
    let drums = read_audio(out_dir.join("output_demucs").join("drums.wav")).unwrap();
    assert_eq!(drums.sample_rate, 44_100);
    assert_eq!(drums.channels, 2);

    // Open-Unmix: loaded at the native 22.05 kHz, saved at 44.1 kHz.
    let report = run_backend(BackendKind::OpenUnmix, &cfg).unwrap();
    assert_eq!(report.files.len(), 4);
    let bass = read_audio(out_dir.join("output_openunmix").join("bass.wav")).unwrap();
    assert_eq!(bass.sample_rate, 44_100);
    assert_eq!(bass.channels, 2);
    let expected = frames * 2;
    assert!(bass.frames().abs_diff(expected) <= expected / 100);

    // Comparison run over all three.
    let reports = run_all(BackendKind::all(), &cfg).unwrap();
    let names: Vec<&str> = reports.iter().map(|r| r.backend).collect();
    assert_eq!(names, vec!["spleeter", "demucs", "openunmix"]);

    // A tool that exits non-zero surfaces its stderr.
    let mut broken = cfg.clone();
    broken.demucs.program = failing.to_string_lossy().into_owned();
    match run_backend(BackendKind::Demucs, &broken) {
        Err(HarnessError::BackendFailed { backend, stderr, .. }) => {
            assert_eq!(backend, "demucs");
            assert!(stderr.contains("model weights missing"), "stderr: {stderr}");
        }
        other => panic!("expected BackendFailed, got {other:?}"),
    }

    // A tool that succeeds without writing anything.
    let mut empty = cfg.clone();
    empty.openunmix.program = silent.to_string_lossy().into_owned();
    let err = run_backend(BackendKind::OpenUnmix, &empty).unwrap_err();
    assert!(matches!(err, HarnessError::NoStems { backend: "openunmix" }), "got {err:?}");

    // A tool that is not installed.
    let mut missing = cfg.clone();
    missing.spleeter.program = bin.join("not-installed").to_string_lossy().into_owned();
    let err = run_backend(BackendKind::Spleeter, &missing).unwrap_err();
    assert!(matches!(err, HarnessError::BackendUnavailable { .. }), "got {err:?}");
}
