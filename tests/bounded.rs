use sat_explorer::sat::bounded::{Harness, Outcome};
use sat_explorer::sat::cnf::Cnf;
use sat_explorer::sat::dimacs::parse_str;
use sat_explorer::sat::solver::Algorithm;
use std::process::Command;
use std::time::{Duration, Instant};

const BIN: &str = env!("CARGO_BIN_EXE_sat-explorer");

/// Pigeons into holes, one pigeon per hole. Unsatisfiable whenever
/// `pigeons > holes`, and hard for resolution.
fn pigeonhole(pigeons: i32, holes: i32) -> Cnf {
    let var = |pigeon: i32, hole: i32| pigeon * holes + hole + 1;
    let mut clauses: Vec<Vec<i32>> = (0..pigeons)
        .map(|p| (0..holes).map(|h| var(p, h)).collect())
        .collect();
    for h in 0..holes {
        for p in 0..pigeons {
            for q in p + 1..pigeons {
                clauses.push(vec![-var(p, h), -var(q, h)]);
            }
        }
    }
    Cnf::new(clauses).unwrap()
}

fn harness() -> Harness {
    Harness::new(BIN)
}

#[test]
fn test_fast_instances_answer_before_the_deadline() {
    let sat = Cnf::new(vec![vec![1, 2], vec![-1, 3], vec![-3]]).unwrap();
    let unsat = pigeonhole(4, 3);

    for algorithm in Algorithm::ALL {
        let deadline = Duration::from_secs(30);
        assert_eq!(
            harness().run_bounded(algorithm, &sat, deadline),
            Outcome::Satisfiable,
            "{algorithm}"
        );
    }
    for algorithm in [Algorithm::Dp, Algorithm::Dpll] {
        let report = harness().run(algorithm, &unsat, Duration::from_secs(30));
        assert_eq!(report.outcome, Outcome::Unsatisfiable, "{algorithm}");
        assert!(report.elapsed < Duration::from_secs(30));
    }
}

#[test]
fn test_empty_formula_and_empty_clause() {
    let deadline = Duration::from_secs(30);
    assert_eq!(
        harness().run_bounded(Algorithm::Resolution, &Cnf::default(), deadline),
        Outcome::Satisfiable
    );
    let empty_clause = Cnf::new(vec![Vec::<i32>::new()]).unwrap();
    assert_eq!(
        harness().run_bounded(Algorithm::Resolution, &empty_clause, deadline),
        Outcome::Unsatisfiable
    );
}

#[test]
fn test_resolution_on_pigeonhole_times_out() {
    let cnf = pigeonhole(9, 8);
    let deadline = Duration::from_millis(500);

    let start = Instant::now();
    let report = harness().run(Algorithm::Resolution, &cnf, deadline);

    assert_eq!(report.outcome, Outcome::Timeout);
    assert!(report.elapsed >= deadline);
    assert!(start.elapsed() < deadline + Duration::from_secs(5));
    assert_eq!(report.worker_allocated_bytes, None);
}

/// Whether a process with this id still exists, reaped or not.
#[cfg(target_os = "linux")]
fn process_exists(pid: u32) -> bool {
    std::path::Path::new(&format!("/proc/{pid}")).exists()
}

#[test]
fn test_repeated_timeouts_are_independent() {
    let cnf = pigeonhole(9, 8);
    let harness = harness();

    for _ in 0..5 {
        let report = harness.run(Algorithm::Resolution, &cnf, Duration::from_millis(200));
        assert_eq!(report.outcome, Outcome::Timeout);
        let pid = report.worker_pid.unwrap();
        #[cfg(target_os = "linux")]
        assert!(!process_exists(pid), "worker {pid} outlived its timeout");
    }

    // The harness is still usable after killing workers.
    let small = Cnf::new(vec![vec![1], vec![-1]]).unwrap();
    assert_eq!(
        harness.run_bounded(Algorithm::Dpll, &small, Duration::from_secs(30)),
        Outcome::Unsatisfiable
    );
}

#[test]
fn test_worker_rejecting_its_arguments_is_a_failure() {
    let harness = Harness::with_args(BIN, ["worker", "--no-such-flag"]);
    let cnf = Cnf::new(vec![vec![1]]).unwrap();

    match harness.run_bounded(Algorithm::Dp, &cnf, Duration::from_secs(30)) {
        Outcome::Failure(reason) => assert!(reason.contains("no-such-flag"), "{reason}"),
        other => panic!("expected a failure, got {other}"),
    }
}

#[test]
fn test_program_that_is_not_a_worker_is_a_failure() {
    // `text` accepts `--algorithm` but reports in its own format, without an `s` line.
    let harness = Harness::with_args(BIN, ["text", "--input", "1 0"]);
    let cnf = Cnf::new(vec![vec![1]]).unwrap();

    match harness.run_bounded(Algorithm::Dp, &cnf, Duration::from_secs(30)) {
        Outcome::Failure(reason) => assert!(reason.contains("no verdict"), "{reason}"),
        other => panic!("expected a failure, got {other}"),
    }
}

#[test]
fn test_cli_text_reports_each_verdict() {
    let output = Command::new(BIN)
        .args(["text", "--input", "1 0\\n-1 0", "--algorithm", "dpll"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("UNSATISFIABLE"), "{stdout}");
}

#[test]
fn test_cli_runs_resolution_in_a_bounded_worker() {
    let output = Command::new(BIN)
        .args(["text", "--input", "1 2 0\\n-1 0\\n-2 0", "--algorithm", "resolution"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("UNSATISFIABLE"), "{stdout}");

    let output = Command::new(BIN)
        .args([
            "text",
            "--input",
            "1 2 0\\n-1 0",
            "--algorithm",
            "resolution",
            "--timeout",
            "30",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("SATISFIABLE") && !stdout.contains("UNSATISFIABLE"), "{stdout}");
}

#[test]
fn test_cli_generate_writes_dimacs() {
    let output = Command::new(BIN)
        .args(["generate", "--vars", "10", "--clauses", "42", "--seed", "5"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let cnf = parse_str(&String::from_utf8(output.stdout).unwrap()).unwrap();
    assert_eq!(cnf.len(), 42);
    assert!(cnf.iter().all(|clause| clause.len() == 3));
}

#[test]
fn test_cli_experiment_on_a_small_sweep() {
    let output = Command::new(BIN)
        .args([
            "experiment",
            "--sizes",
            "5x15,10x20",
            "--timeout",
            "5",
            "--seed",
            "3",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("5 variables, 15 clauses"), "{stdout}");
    assert!(stdout.contains("skipped"), "{stdout}");
    assert!(stdout.contains("All experiments completed!"), "{stdout}");
}
