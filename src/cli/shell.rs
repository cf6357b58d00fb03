//! Interactive file shell
//!
//! Read-eval loop over whitespace-delimited commands. Each command is one
//! request to the service; a failed request is reported and the loop
//! carries on.

use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use super::client::FileApi;
use super::errors::CliResult;

const RULE: &str = "============================================";

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Put { file_name: String },
    Get { file_name: String, owner: String },
    View { owner: Option<String> },
    Help,
    Quit,
    Invalid,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Self {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            ["put", file_name] => ShellCommand::Put {
                file_name: file_name.to_string(),
            },
            ["get", file_name, owner] => ShellCommand::Get {
                file_name: file_name.to_string(),
                owner: owner.to_string(),
            },
            ["view"] => ShellCommand::View { owner: None },
            ["view", owner] => ShellCommand::View {
                owner: Some(owner.to_string()),
            },
            ["help"] => ShellCommand::Help,
            ["quit"] => ShellCommand::Quit,
            _ => ShellCommand::Invalid,
        }
    }
}

/// Shell session bound to one owner and a working directory
pub struct Shell<'a, A: FileApi> {
    api: &'a A,
    owner: String,
    workdir: PathBuf,
}

impl<'a, A: FileApi> Shell<'a, A> {
    pub fn new(api: &'a A, owner: impl Into<String>, workdir: PathBuf) -> Self {
        Self {
            api,
            owner: owner.into(),
            workdir,
        }
    }

    /// Run until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> CliResult<()> {
        self.banner(out)?;

        let mut lines = input.lines();
        loop {
            write!(out, ">> ")?;
            out.flush()?;

            let line = match lines.next() {
                Some(line) => line?,
                None => break,
            };

            if !self.execute(ShellCommand::parse(&line), out)? {
                break;
            }
        }

        writeln!(out, "{}", RULE)?;
        Ok(())
    }

    /// Execute one command. Returns false when the session should end.
    pub fn execute<W: Write>(&self, command: ShellCommand, out: &mut W) -> CliResult<bool> {
        match command {
            ShellCommand::Put { file_name } => self.put(&file_name, out)?,
            ShellCommand::Get { file_name, owner } => self.get(&file_name, &owner, out)?,
            ShellCommand::View { owner } => {
                let owner = owner.unwrap_or_else(|| self.owner.clone());
                self.view(&owner, out)?
            }
            ShellCommand::Help => self.commands(out)?,
            ShellCommand::Quit => return Ok(false),
            ShellCommand::Invalid => writeln!(out, "Invalid command. Please try again.")?,
        }
        Ok(true)
    }

    fn banner<W: Write>(&self, out: &mut W) -> CliResult<()> {
        writeln!(out, "Welcome to filedrop")?;
        self.commands(out)
    }

    fn commands<W: Write>(&self, out: &mut W) -> CliResult<()> {
        writeln!(out, "{}", RULE)?;
        writeln!(out, "Available commands:")?;
        writeln!(out, "  - put filename: Upload a file")?;
        writeln!(out, "  - get filename username: Download a file")?;
        writeln!(out, "  - view [username]: List files")?;
        writeln!(out, "  - help: Show this list")?;
        writeln!(out, "  - quit: Exit the program")?;
        writeln!(out, "{}", RULE)?;
        Ok(())
    }

    fn put<W: Write>(&self, file_name: &str, out: &mut W) -> CliResult<()> {
        let path = self.workdir.join(file_name);
        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(e) => {
                writeln!(out, "Error reading file {}: {}", path.display(), e)?;
                return Ok(());
            }
        };
        if content.is_empty() {
            writeln!(out, "Cannot upload empty file {}.", file_name)?;
            return Ok(());
        }

        match self.api.upload(&self.owner, file_name, &content) {
            Ok(()) => writeln!(out, "File uploaded successfully.")?,
            Err(e) => writeln!(out, "Error making API request: {}", e)?,
        }
        Ok(())
    }

    fn get<W: Write>(&self, file_name: &str, owner: &str, out: &mut W) -> CliResult<()> {
        let url = match self.api.download_url(owner, file_name) {
            Ok(Some(url)) => url,
            Ok(None) => {
                writeln!(out, "File not found.")?;
                return Ok(());
            }
            Err(e) => {
                writeln!(out, "Error making API request: {}", e)?;
                return Ok(());
            }
        };

        writeln!(out, "Downloading file...")?;
        let content = match self.api.fetch(&url) {
            Ok(content) => content,
            Err(e) => {
                writeln!(out, "Error downloading file: {}", e)?;
                return Ok(());
            }
        };

        let path = self.workdir.join(file_name);
        match fs::write(&path, content) {
            Ok(()) => writeln!(out, "File downloaded successfully.")?,
            Err(e) => writeln!(out, "Error writing file {}: {}", path.display(), e)?,
        }
        Ok(())
    }

    fn view<W: Write>(&self, owner: &str, out: &mut W) -> CliResult<()> {
        match self.api.view(owner) {
            Ok(files) if files.is_empty() => writeln!(out, "No files found for this owner.")?,
            Ok(files) => {
                for file in files {
                    writeln!(out, "{}", file)?;
                }
            }
            Err(e) => writeln!(out, "Error making API request: {}", e)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliError;
    use std::collections::BTreeMap;
    use std::io::Cursor;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// In-memory stand-in for the service
    #[derive(Default)]
    struct FakeApi {
        files: Mutex<BTreeMap<(String, String), Vec<u8>>>,
        offline: bool,
    }

    impl FileApi for FakeApi {
        fn upload(&self, owner: &str, file_name: &str, content: &[u8]) -> CliResult<()> {
            if self.offline {
                return Err(CliError::request_failed("connection refused"));
            }
            self.files
                .lock()
                .unwrap()
                .insert((owner.to_string(), file_name.to_string()), content.to_vec());
            Ok(())
        }

        fn view(&self, owner: &str) -> CliResult<Vec<String>> {
            if self.offline {
                return Err(CliError::request_failed("connection refused"));
            }
            Ok(self
                .files
                .lock()
                .unwrap()
                .keys()
                .filter(|(o, _)| o == owner)
                .map(|(_, f)| f.clone())
                .collect())
        }

        fn download_url(&self, owner: &str, file_name: &str) -> CliResult<Option<String>> {
            let files = self.files.lock().unwrap();
            Ok(files
                .contains_key(&(owner.to_string(), file_name.to_string()))
                .then(|| format!("{}/{}", owner, file_name)))
        }

        fn fetch(&self, url: &str) -> CliResult<Vec<u8>> {
            let (owner, file_name) = url.split_once('/').unwrap();
            self.files
                .lock()
                .unwrap()
                .get(&(owner.to_string(), file_name.to_string()))
                .cloned()
                .ok_or_else(|| CliError::request_failed("gone"))
        }
    }

    fn run(shell: &Shell<'_, FakeApi>, input: &str) -> String {
        let mut out = Vec::new();
        shell.run(Cursor::new(input.to_string()), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            ShellCommand::parse("put a.txt"),
            ShellCommand::Put {
                file_name: "a.txt".into()
            }
        );
        assert_eq!(
            ShellCommand::parse("  get a.txt alice "),
            ShellCommand::Get {
                file_name: "a.txt".into(),
                owner: "alice".into()
            }
        );
        assert_eq!(ShellCommand::parse("view"), ShellCommand::View { owner: None });
        assert_eq!(ShellCommand::parse("quit"), ShellCommand::Quit);
        assert_eq!(ShellCommand::parse("put"), ShellCommand::Invalid);
        assert_eq!(ShellCommand::parse("get a.txt"), ShellCommand::Invalid);
        assert_eq!(ShellCommand::parse("login bob pw"), ShellCommand::Invalid);
        assert_eq!(ShellCommand::parse(""), ShellCommand::Invalid);
    }

    #[test]
    fn test_put_view_get_session() {
        let upload_dir = TempDir::new().unwrap();
        let download_dir = TempDir::new().unwrap();
        fs::write(upload_dir.path().join("a.txt"), b"hi").unwrap();

        let api = FakeApi::default();
        let uploader = Shell::new(&api, "alice", upload_dir.path().to_path_buf());
        let output = run(&uploader, "put a.txt\nview\nquit\n");
        assert!(output.contains("File uploaded successfully."));
        assert!(output.contains("\na.txt\n") || output.contains(">> a.txt\n"));

        let downloader = Shell::new(&api, "bob", download_dir.path().to_path_buf());
        let output = run(&downloader, "get a.txt alice\nget missing.txt alice\n");
        assert!(output.contains("Downloading file..."));
        assert!(output.contains("File downloaded successfully."));
        assert!(output.contains("File not found."));
        assert_eq!(fs::read(download_dir.path().join("a.txt")).unwrap(), b"hi");
    }

    #[test]
    fn test_view_empty_owner() {
        let dir = TempDir::new().unwrap();
        let api = FakeApi::default();
        let shell = Shell::new(&api, "carol", dir.path().to_path_buf());

        let output = run(&shell, "view\n");
        assert!(output.contains("No files found for this owner."));
    }

    #[test]
    fn test_invalid_and_missing_file() {
        let dir = TempDir::new().unwrap();
        let api = FakeApi::default();
        let shell = Shell::new(&api, "p", dir.path().to_path_buf());

        let output = run(&shell, "newuser a b b\nput nothere.txt\nquit\nview\n");
        assert!(output.contains("Invalid command. Please try again."));
        assert!(output.contains("Error reading file"));
        // Nothing after quit is executed
        assert!(!output.contains("No files found"));
    }

    #[test]
    fn test_request_failure_keeps_session() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"hi").unwrap();
        let api = FakeApi {
            offline: true,
            ..FakeApi::default()
        };
        let shell = Shell::new(&api, "p", dir.path().to_path_buf());

        let output = run(&shell, "put a.txt\nhelp\n");
        assert!(output.contains("Error making API request"));
        assert_eq!(output.matches("Available commands:").count(), 2);
    }
}
