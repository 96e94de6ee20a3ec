use std::process::Command;

fn traffic_jam() -> Command {
    Command::new(env!("CARGO_BIN_EXE_traffic_jam"))
}

/// Test that the simulation runs in headless mode without crashing
#[test]
fn test_headless_simulation_runs() {
    let output = traffic_jam()
        .args(["--ticks", "30", "--map-every", "10"])
        .env("RUST_LOG", "warn,traffic_jam=info")
        .output()
        .expect("Failed to execute simulation");

    assert!(
        output.status.success(),
        "Simulation failed to run in headless mode. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Initial state:"));
    assert!(stdout.contains("--- After tick 30 ---"));
    assert!(stdout.contains("=== Final State ==="));
}

/// Test that simulation statistics are logged
#[test]
fn test_simulation_statistics_logged() {
    let output = traffic_jam()
        .args(["--ticks", "10", "--map-every", "0"])
        .env("RUST_LOG", "warn,traffic_jam=info")
        .output()
        .expect("Failed to execute simulation");

    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    for needle in [
        "Ticks completed: 10",
        "Cars: 32",
        "Mean speed:",
        "Speed range:",
        "Stopped cars:",
        "Total laps:",
        "Keyframes recorded: 352",
    ] {
        assert!(stderr.contains(needle), "Missing '{}' statistic", needle);
    }
}

/// Test that the CSV output holds one row per car per tick plus the initial placement
#[test]
fn test_csv_output_written() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("run.csv");

    let output = traffic_jam()
        .args(["--ticks", "5", "--cars", "4", "--segments", "40", "--map-every", "0"])
        .arg("--perturb")
        .arg("2:1:3:0")
        .arg("--csv")
        .arg(&path)
        .output()
        .expect("Failed to execute simulation");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let contents = std::fs::read_to_string(&path).expect("CSV file missing");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "tick,car_id,lane,segment,speed_kmh,wrap_count");
    assert_eq!(lines.len(), 1 + 6 * 4);
    assert_eq!(lines[1], "0,1,0,0,0,0");
    // Car 2 is held at a standstill on ticks 1 and 2
    assert!(lines.contains(&"1,2,0,10,0,0"));
    assert!(lines.contains(&"2,2,0,10,0,0"));
}

/// Test that an impossible configuration is reported as a failure
#[test]
fn test_invalid_configuration_fails() {
    let output = traffic_jam()
        .args(["--cars", "50", "--segments", "10"])
        .output()
        .expect("Failed to execute simulation");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("do not fit"),
        "Unexpected error output: {}",
        stderr
    );
}

/// Test that the classic scenario starts at full speed and holds car 10 back
#[test]
fn test_classic_scenario_flag() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("classic.csv");

    let output = traffic_jam()
        .args(["--classic", "--ticks", "25", "--map-every", "0"])
        .arg("--csv")
        .arg(&path)
        .output()
        .expect("Failed to execute simulation");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let contents = std::fs::read_to_string(&path).expect("CSV file missing");
    let rows: Vec<Vec<&str>> = contents
        .lines()
        .skip(1)
        .map(|line| line.split(',').collect())
        .collect();
    assert_eq!(rows.len(), 26 * 32);
    assert!(rows
        .iter()
        .filter(|row| row[0] == "0")
        .all(|row| row[4] == "130"));
    let slowed: Vec<&str> = rows
        .iter()
        .filter(|row| row[1] == "10" && ["21", "25"].contains(&row[0]))
        .map(|row| row[4])
        .collect();
    assert_eq!(slowed, vec!["21", "21"]);
}
