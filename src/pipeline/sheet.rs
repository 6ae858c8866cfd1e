use std::fs::File;
use std::io::{BufReader, ErrorKind as IoErrorKind};
use std::path::{Path, PathBuf};

use dino_extract::sheet::{SheetLayout, read_records};
use dino_storage::OutputDir;
use exn::ResultExt;
use tracing::{info, instrument};

use super::{RecordFile, save_records};
use crate::error::{ErrorKind, Result};

/// Converts a spreadsheet export into a record collection saved as
/// `file_name`, or `<input stem>.json` by default.
#[instrument(skip_all, fields(input = %input.display()))]
pub fn convert(input: &Path, layout: SheetLayout, output: &OutputDir, file_name: Option<&Path>) -> Result<PathBuf> {
    let file = match File::open(input) {
        Ok(file) => file,
        Err(error) if error.kind() == IoErrorKind::NotFound => {
            return Err(error).or_raise(|| ErrorKind::MissingInput(input.to_path_buf()));
        },
        Err(error) => return Err(error).or_raise(|| ErrorKind::Input(input.to_path_buf())),
    };
    let records = read_records(BufReader::new(file), layout).or_raise(|| ErrorKind::Input(input.to_path_buf()))?;
    info!(records = records.len(), "converted spreadsheet");
    let file_name = match file_name {
        Some(name) => name.to_path_buf(),
        None => default_name(input),
    };
    save_records(output, &file_name, &RecordFile::from(records))
}

fn default_name(input: &Path) -> PathBuf {
    let stem = input.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_else(|| "Dinos".to_string());
    PathBuf::from(format!("{stem}.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn converts_spreadsheet_to_json() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("Dinos.csv");
        fs::write(&input, b"Name;Variants\n;;;;Base;Wild;Tame\nRex;Tek;;The Island;1100;220;0,5\n\n;;;\nTh\xe9rizino;;x\n").unwrap();
        let output = OutputDir::new(temp.path().join("out")).unwrap();

        let path = convert(&input, SheetLayout::default(), &output, None).unwrap();

        assert_eq!(path, temp.path().join("out/Dinos.json"));
        let json: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let records = json.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "Rex");
        assert_eq!(records[0]["variants"][0], "Tek");
        assert_eq!(records[0]["maps"][0], "The Island");
        assert_eq!(records[0]["stats"]["Health"]["Tame"], 1);
        assert_eq!(records[0]["stats"]["Torpor"]["Tame"], 0);
        assert_eq!(records[0]["icon"], Value::Null);
        assert_eq!(records[1]["name"], "Th\u{e9}rizino");
        assert_eq!(records[1]["boss"], true);
    }

    #[test]
    fn explicit_output_name() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("export.csv");
        fs::write(&input, "h\nh\nDodo\n").unwrap();
        let output = OutputDir::new(temp.path()).unwrap();
        let path = convert(&input, SheetLayout::default(), &output, Some(Path::new("records.json"))).unwrap();
        assert!(path.ends_with("records.json"));
    }

    #[test]
    fn missing_input_is_an_error() {
        let temp = TempDir::new().unwrap();
        let output = OutputDir::new(temp.path()).unwrap();
        let input = temp.path().join("nope.csv");
        let error = convert(&input, SheetLayout::default(), &output, None).unwrap_err();
        assert_eq!(*error, ErrorKind::MissingInput(input));
    }
}
