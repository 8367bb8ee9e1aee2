use std::process::Command;

fn run_headless(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_city_traffic"))
        .args(args)
        .env("RUST_LOG", "warn,city_traffic=info")
        .output()
        .expect("Failed to execute simulation")
}

/// Test that the simulation runs in headless mode without crashing
#[test]
fn test_headless_simulation_runs() {
    let output = run_headless(&["--steps", "60", "--seed", "7"]);

    // Check that the simulation exited successfully
    assert!(
        output.status.success(),
        "Simulation failed to run in headless mode. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);

    // Verify simulation complete message is present
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );
}

/// Test that simulation statistics are logged
#[test]
fn test_simulation_statistics_logged() {
    let output = run_headless(&["--steps", "30", "--seed", "7"]);

    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        stderr.contains("Total cars spawned:"),
        "Missing 'Total cars spawned' statistic"
    );
    assert!(
        stderr.contains("Total cars arrived:"),
        "Missing 'Total cars arrived' statistic"
    );
    assert!(
        stderr.contains("Active cars:"),
        "Missing 'Active cars' statistic"
    );
    assert!(
        stderr.contains("Incomplete routes:"),
        "Missing 'Incomplete routes' statistic"
    );
}

/// Test that the final map is printed to stdout
#[test]
fn test_final_state_printed() {
    let output = run_headless(&["--steps", "5", "--report-every", "0"]);

    assert!(output.status.success(), "Simulation failed to run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("=== Final State ==="));
    assert!(stdout.contains("Step: 5"));
}

/// A missing map file is a fatal configuration error
#[test]
fn test_missing_map_fails() {
    let output = run_headless(&["--map", "does/not/exist.txt", "--steps", "1"]);

    assert!(!output.status.success(), "Simulation should refuse a missing map");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to load map"),
        "Unexpected error output: {}",
        stderr
    );
}
