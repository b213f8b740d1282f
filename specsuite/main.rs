use hcl_lite::testspec::TestSpec;
use hcl_lite::validate::Severity;
use hcl_lite::Value;
use std::error::Error;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

fn find_tests<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut tests = Vec::new();

    let root = root.as_ref();

    if root.is_dir() {
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                tests.extend(find_tests(path)?);
            } else if path.is_file() && path.extension() == Some(OsStr::new("hcl")) {
                tests.push(path);
            }
        }
    }

    Ok(tests)
}

enum Outcome {
    Ok,
    Fail(String),
}

fn run_test(contents: &str, spec: &TestSpec) -> Outcome {
    let diagnostics = hcl_lite::validate(contents);

    if !spec.diagnostics_match(&diagnostics) {
        return Outcome::Fail(format!(
            "Diagnostics: {diagnostics:#?}\nExpect: {:#?}",
            spec.diagnostics
        ));
    }

    let expect_errors = spec
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Error);

    match hcl_lite::parse(contents) {
        Ok(_) if expect_errors => Outcome::Fail("parsing succeeded unexpectedly".to_owned()),
        Ok(map) => {
            let found = Value::Object(map);

            match &spec.result {
                Some(expected) if &found != expected => {
                    Outcome::Fail(format!("Found: {found:?}\nExpect: {expected:?}"))
                }
                _ if !spec.result_type_matches(&found) => Outcome::Fail(format!(
                    "Found: {found:?}\nExpect type: {:?}",
                    spec.result_type
                )),
                _ => Outcome::Ok,
            }
        }
        Err(_) if expect_errors => Outcome::Ok,
        Err(err) => Outcome::Fail(err.to_string()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let timer = Instant::now();
    let mut failures = 0;
    let mut ignored = 0;
    let mut successes = 0;

    let mut tests = find_tests("specsuite/")?;
    tests.sort();

    println!("running {} tests", tests.len());
    for test in tests {
        print!("test {} ... ", test.display());

        let spec_path = test.with_extension("t");
        if !spec_path.is_file() {
            ignored += 1;
            println!("\x1b[33mignored\x1b[0m");
            continue;
        }

        let spec = TestSpec::parse(&fs::read_to_string(&spec_path)?)?;
        let contents = fs::read_to_string(&test)?;

        match run_test(&contents, &spec) {
            Outcome::Ok => {
                successes += 1;
                println!("\x1b[32mok\x1b[0m");
            }
            Outcome::Fail(reason) => {
                failures += 1;
                println!("\x1b[31mfail\x1b[0m\n{reason}");
            }
        }
    }

    println!(
        "\ntest result: {}. {} passed; {} failed; {} ignored; finished in {:.2}s\n",
        if failures == 0 {
            "\x1b[32mok\x1b[0m"
        } else {
            "\x1b[31mFAILED\x1b[0m"
        },
        successes,
        failures,
        ignored,
        timer.elapsed().as_secs_f64()
    );

    if failures > 0 {
        std::process::exit(1);
    }

    Ok(())
}
