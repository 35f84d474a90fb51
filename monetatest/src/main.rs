// Copyright Materialize, Inc. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository, or online at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::process;

use monetatest::ast;
use monetatest::parse;
use monetatest::run::{self, Outcome, Report};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut paths = vec![];
    let mut verbose = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-v" => verbose = true,
            _ => paths.push(PathBuf::from(arg)),
        }
    }
    if paths.is_empty() {
        return Err("usage: monetatest [-v] <FILE>...".into());
    }

    let mut reporter = ConsoleReporter::new(verbose);

    for path in paths {
        let file = parse::parse_file(&path)?;
        run::run_file(&mut reporter, &file)?;
    }

    if !reporter.failed.is_empty() {
        println!();
        for (id, cause) in &reporter.failed {
            println!("{}: {}", id, cause);
        }
    }
    println!("PASS {}", reporter.passed);
    println!("FAIL {}", reporter.failed.len());
    println!("SKIP {}", reporter.skipped);

    if !reporter.failed.is_empty() {
        process::exit(1)
    }
    Ok(())
}

struct ConsoleReporter {
    passed: usize,
    skipped: usize,
    /// The id and cause of every failed test, in order.
    failed: Vec<(String, String)>,
    current: Option<String>,
    verbose: bool,
}

impl ConsoleReporter {
    fn new(verbose: bool) -> ConsoleReporter {
        ConsoleReporter {
            passed: 0,
            skipped: 0,
            failed: vec![],
            current: None,
            verbose,
        }
    }
}

impl Report for ConsoleReporter {
    fn start_file(&mut self, file: &ast::File) {
        println!("==> {}", file.path.display())
    }

    fn finish_file(&mut self) {}

    fn start_test(&mut self, test: &ast::Test) {
        if self.verbose {
            print!("{} {} -> {}", test.id, test.operation, test.result);
            if !test.conditions.is_empty() {
                let conditions: Vec<_> = test.conditions.iter().map(|c| c.to_string()).collect();
                print!(" {}", conditions.join(" "));
            }
            print!(" ... ");
        }
        self.current = Some(test.id.clone());
    }

    fn finish_test(&mut self, outcome: Outcome) {
        let id = self.current.take().unwrap_or_default();
        let status = match outcome {
            Outcome::Passed => {
                self.passed += 1;
                "ok"
            }
            Outcome::Skipped => {
                self.skipped += 1;
                "skipped"
            }
            Outcome::Failed { cause } => {
                self.failed.push((id, cause.to_string()));
                "FAILED"
            }
        };
        if self.verbose {
            println!("{}", status);
        }
    }
}
