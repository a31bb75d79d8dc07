use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn trianalyze() -> Command {
    Command::cargo_bin("trianalyze").unwrap()
}

#[test]
fn test_no_arguments_prints_help() {
    trianalyze()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--pcap"));
}

#[test]
fn test_missing_capture_exits_with_code_3() {
    let temp_dir = TempDir::new().unwrap();

    trianalyze()
        .current_dir(temp_dir.path())
        .args(["--pcap", "absent.pcap", "--cleanup", "keep"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("absent.pcap"));

    assert!(!temp_dir.path().join("Output").exists());
}

#[test]
fn test_unsupported_format_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("traffic.pcap"), b"pcap").unwrap();

    trianalyze()
        .current_dir(temp_dir.path())
        .args(["--pcap", "traffic.pcap", "-f", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("excel, csv, json"));

    assert!(!temp_dir.path().join("Output").exists());
}

#[test]
fn test_generate_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("trianalyze.toml");

    trianalyze()
        .arg("--generate-config")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated sample configuration file"));

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[output]"));
    assert!(content.contains("NetworkMinerCLI.exe"));
}

#[test]
fn test_dry_run_launches_nothing() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("traffic.pcap"), b"pcap").unwrap();

    trianalyze()
        .current_dir(temp_dir.path())
        .args(["--pcap", "traffic.pcap", "--dry-run", "--message-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NetworkMinerCLI.exe"))
        .stdout(predicate::str::contains("traffic.pcap"));

    assert!(!temp_dir.path().join("Output").exists());
    assert!(!temp_dir.path().join("netminercli").exists());
}

#[cfg(unix)]
mod scripted_tools {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    struct Workspace {
        temp_dir: TempDir,
        config_path: PathBuf,
    }

    impl Workspace {
        fn path(&self) -> &Path {
            self.temp_dir.path()
        }

        fn extraction_dir(&self) -> PathBuf {
            self.path().join("AssembledFiles")
        }
    }

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Carver drops two documents and a picture; analyzers echo the file name.
    fn workspace() -> Workspace {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("traffic.pcap"), b"pcap").unwrap();

        let carver = write_script(
            root,
            "carver.sh",
            "mkdir -p \"$1/10.0.0.5/TCP-80\"\n\
             echo doc > \"$1/10.0.0.5/TCP-80/memo.doc\"\n\
             echo xls > \"$1/budget.XLS\"\n\
             echo png > \"$1/logo.png\"",
        );
        let ole_dump = write_script(root, "oledump.sh", "echo \"streams of $(basename \"$1\")\"");
        let metadata = write_script(root, "exiftool.sh", "echo \"File Name: $(basename \"$1\")\"");

        let extraction_dir = root.join("AssembledFiles");
        let config_path = root.join("trianalyze.toml");
        let config = format!(
            "[tools]\n\
             extraction_dir = \"{extraction}\"\n\n\
             [tools.carver]\n\
             program = \"{carver}\"\n\
             args = [\"{extraction}\"]\n\n\
             [tools.ole_dump]\n\
             program = \"{ole_dump}\"\n\n\
             [tools.metadata]\n\
             program = \"{metadata}\"\n\n\
             [output]\n\
             directory = \"{output}\"\n",
            extraction = extraction_dir.display(),
            carver = carver.display(),
            ole_dump = ole_dump.display(),
            metadata = metadata.display(),
            output = root.join("Output").display(),
        );
        fs::write(&config_path, config).unwrap();

        Workspace {
            temp_dir,
            config_path,
        }
    }

    #[test]
    fn test_full_run_exports_json_lines() {
        let ws = workspace();

        trianalyze()
            .current_dir(ws.path())
            .arg("--pcap")
            .arg(ws.path().join("traffic.pcap"))
            .arg("--config")
            .arg(&ws.config_path)
            .args(["-f", "json", "--cleanup", "keep", "--message-format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("results.json"));

        let content = fs::read_to_string(ws.path().join("Output").join("results.json")).unwrap();
        let rows: Vec<serde_json::Value> = content
            .lines()
            .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
            .collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["File"], "budget.XLS");
        assert_eq!(rows[1]["File"], "memo.doc");
        assert_eq!(rows[1]["Oledump_Output"], "streams of memo.doc\n");
        assert_eq!(rows[1]["Exiftool_Output"], "File Name: memo.doc\n");

        assert!(ws.extraction_dir().join("logo.png").exists());
    }

    #[test]
    fn test_prompt_answer_n_clears_extraction_dir() {
        let ws = workspace();

        trianalyze()
            .current_dir(ws.path())
            .arg("--pcap")
            .arg(ws.path().join("traffic.pcap"))
            .arg("--config")
            .arg(&ws.config_path)
            .args(["--message-format", "plain"])
            .write_stdin("n\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("Keep network miner files? [y/n]: "));

        assert!(ws.path().join("Output").join("results.csv").exists());
        assert!(ws.extraction_dir().is_dir());
        assert_eq!(fs::read_dir(ws.extraction_dir()).unwrap().count(), 0);
    }

    #[test]
    fn test_json_messages_keep_prompt_off_stdout() {
        let ws = workspace();

        let assert = trianalyze()
            .current_dir(ws.path())
            .arg("--pcap")
            .arg(ws.path().join("traffic.pcap"))
            .arg("--config")
            .arg(&ws.config_path)
            .args(["--message-format", "json"])
            .write_stdin("y\n")
            .assert()
            .success()
            .stderr(predicate::str::contains("Keep network miner files? [y/n]: "));

        let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
        assert!(!stdout.is_empty());
        for line in stdout.lines() {
            let message: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(message["type"].is_string());
        }
        assert!(ws.extraction_dir().join("budget.XLS").exists());
    }

    #[test]
    fn test_output_inside_extraction_dir_is_rejected() {
        let ws = workspace();

        trianalyze()
            .current_dir(ws.path())
            .arg("--pcap")
            .arg(ws.path().join("traffic.pcap"))
            .arg("--config")
            .arg(&ws.config_path)
            .arg("-o")
            .arg(ws.extraction_dir().join("out"))
            .assert()
            .code(2);

        assert!(!ws.extraction_dir().exists());
    }

    #[test]
    fn test_failing_analyzer_does_not_abort() {
        let ws = workspace();
        write_script(ws.path(), "oledump.sh", "echo 'not an OLE file' >&2\nexit 1");

        trianalyze()
            .current_dir(ws.path())
            .arg("--pcap")
            .arg(ws.path().join("traffic.pcap"))
            .arg("--config")
            .arg(&ws.config_path)
            .args(["-f", "csv", "--cleanup", "keep", "-q"])
            .assert()
            .success();

        let mut reader = csv::Reader::from_path(ws.path().join("Output").join("results.csv")).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers, vec!["File", "Oledump_Output", "Exiftool_Output"]);

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[1][0], "memo.doc");
        assert_eq!(&records[1][1], "");
        assert_eq!(&records[1][2], "File Name: memo.doc\n");
    }
}
