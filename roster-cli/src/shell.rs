//! Interactive menu shell
//!
//! All prompting, input parsing, and rendering lives here; the engine only
//! ever sees typed arguments. Blank input for an update field becomes
//! `None` before it reaches the store.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;

use roster_engine::{codec, RecordStore, RosterError, StudentRecord};

/// Menu actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Add,
    Display,
    Update,
    Delete,
    Save,
    Load,
    Exit,
}

impl Choice {
    fn from_input(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Choice::Add),
            "2" => Some(Choice::Display),
            "3" => Some(Choice::Update),
            "4" => Some(Choice::Delete),
            "5" => Some(Choice::Save),
            "6" => Some(Choice::Load),
            "7" => Some(Choice::Exit),
            _ => None,
        }
    }
}

/// What the menu loop should do after an action
enum Flow {
    Continue,
    Quit,
}

/// The interactive shell. Owns the store and the path it syncs with.
pub struct Shell {
    store: RecordStore,
    path: PathBuf,
}

impl Shell {
    pub fn new(store: RecordStore, path: PathBuf) -> Self {
        Shell { store, path }
    }

    /// Run the menu loop until the user exits or stdin closes.
    pub fn run<R: BufRead>(&mut self, input: &mut R) -> Result<()> {
        loop {
            print_menu();
            let Some(line) = prompt(input, "Enter your choice: ")? else {
                return Ok(());
            };
            let Some(choice) = Choice::from_input(&line) else {
                println!("Invalid choice. Try again.\n");
                continue;
            };

            let flow = match choice {
                Choice::Add => self.add(input)?,
                Choice::Display => self.display(input)?,
                Choice::Update => self.update(input)?,
                Choice::Delete => self.delete(input)?,
                Choice::Save => self.save(),
                Choice::Load => self.load(),
                Choice::Exit => {
                    println!("Exiting.");
                    Flow::Quit
                }
            };

            if matches!(flow, Flow::Quit) {
                return Ok(());
            }
        }
    }

    fn add<R: BufRead>(&mut self, input: &mut R) -> Result<Flow> {
        let Some(id) = prompt(input, "Student ID: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(name) = prompt(input, "Name: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(age_input) = prompt(input, "Age: ")? else {
            return Ok(Flow::Quit);
        };
        let Ok(age) = age_input.parse::<i32>() else {
            println!("Age must be an integer.\n");
            return Ok(Flow::Continue);
        };
        let Some(grades_input) = prompt(input, "Grades (space separated, blank for none): ")?
        else {
            return Ok(Flow::Quit);
        };
        let grades = match parse_grades(&grades_input) {
            Ok(grades) => grades,
            Err(bad) => {
                println!("Grade '{bad}' is not an integer.\n");
                return Ok(Flow::Continue);
            }
        };

        match self.store.add(StudentRecord::new(id, name.clone(), age, grades)) {
            Ok(()) => println!("Student {name} added.\n"),
            Err(e) => println!("{e}\n"),
        }
        Ok(Flow::Continue)
    }

    fn display<R: BufRead>(&mut self, input: &mut R) -> Result<Flow> {
        let Some(answer) = prompt(input, "Display from file? (y/n): ")? else {
            return Ok(Flow::Quit);
        };
        if answer.eq_ignore_ascii_case("y") {
            self.display_file();
        } else {
            self.display_memory();
        }
        Ok(Flow::Continue)
    }

    fn display_memory(&self) {
        if self.store.is_empty() {
            println!("No students to display.\n");
            return;
        }
        println!("=== Students in Memory ===");
        for record in self.store.iter() {
            println!(
                "ID: {}, Name: {}, Age: {}",
                record.id, record.name, record.age
            );
            if record.grades.is_empty() {
                println!("Grades: (none)\n");
            } else {
                let grades: Vec<String> = record.grades.iter().map(i32::to_string).collect();
                println!(
                    "Grades: {} (avg {:.1})\n",
                    grades.join(" "),
                    record.average_grade()
                );
            }
        }
    }

    /// Print the file's rows verbatim without importing them.
    fn display_file(&self) {
        println!("=== Students From File ===");
        match std::fs::read_to_string(&self.path) {
            Ok(text) => {
                for line in text.lines().filter(|line| !line.is_empty()) {
                    println!("{line}");
                }
                println!();
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                println!("File does not exist.\n");
            }
            Err(e) => println!("Could not read {}: {e}\n", self.path.display()),
        }
    }

    fn update<R: BufRead>(&mut self, input: &mut R) -> Result<Flow> {
        let Some(id) = prompt(input, "Student ID to update: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(current) = self.store.get(&id) else {
            println!("Student not found.\n");
            return Ok(Flow::Continue);
        };
        println!(
            "Updating {} ({}, age {}). Leave a field blank to keep its value.",
            current.id, current.name, current.age
        );

        let Some(name_input) = prompt(input, "New name: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(age_input) = prompt(input, "New age: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(grades_input) = prompt(input, "New grades (space separated): ")? else {
            return Ok(Flow::Quit);
        };

        let name = blank_to_none(&name_input).map(str::to_string);
        let age = match blank_to_none(&age_input) {
            Some(text) => match text.parse::<i32>() {
                Ok(age) => Some(age),
                Err(_) => {
                    println!("Not an integer; age unchanged.");
                    None
                }
            },
            None => None,
        };
        let grades = match blank_to_none(&grades_input) {
            Some(text) => match parse_grades(text) {
                Ok(grades) => Some(grades),
                Err(bad) => {
                    println!("Grade '{bad}' is not an integer; grades unchanged.");
                    None
                }
            },
            None => None,
        };

        match self.store.update(&id, name, age, grades) {
            Ok(()) => println!("Student updated.\n"),
            Err(e) => println!("{e}\n"),
        }
        Ok(Flow::Continue)
    }

    fn delete<R: BufRead>(&mut self, input: &mut R) -> Result<Flow> {
        let Some(id) = prompt(input, "Student ID to delete: ")? else {
            return Ok(Flow::Quit);
        };
        match self.store.delete(&id) {
            Ok(()) => println!("Student {id} deleted.\n"),
            Err(e) => println!("{e}\n"),
        }
        Ok(Flow::Continue)
    }

    fn save(&self) -> Flow {
        match codec::save(&self.store, &self.path) {
            Ok(()) => println!("Data saved to {}.\n", self.path.display()),
            Err(e) => println!("Save failed: {e}\n"),
        }
        Flow::Continue
    }

    fn load(&mut self) -> Flow {
        match codec::load(&self.path) {
            Ok(loaded) => {
                let count = loaded.len();
                self.store.replace_all(loaded);
                println!("Loaded {count} student(s) from {}.\n", self.path.display());
            }
            Err(RosterError::FileNotFound { .. }) => println!("File not found.\n"),
            Err(e) => println!("Load failed: {e}\n"),
        }
        Flow::Continue
    }
}

fn print_menu() {
    println!("===== Student Roster =====");
    println!("1. Add student");
    println!("2. Display students");
    println!("3. Update student");
    println!("4. Delete student");
    println!("5. Save to file");
    println!("6. Load from file");
    println!("7. Exit");
}

/// Print a label and read one trimmed line. `None` means stdin closed.
fn prompt<R: BufRead>(input: &mut R, label: &str) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Whitespace-separated grade list; an empty input is an empty list.
/// Returns the offending token on a parse failure.
fn parse_grades(input: &str) -> Result<Vec<i32>, String> {
    input
        .split_whitespace()
        .map(|token| token.parse::<i32>().map_err(|_| token.to_string()))
        .collect()
}

fn blank_to_none(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
