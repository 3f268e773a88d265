use anyhow::Context;
use jointcore::skeleton::Frame;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Streams frames from JSON lines, one keypoint dictionary per line. Blank
/// lines are skipped.
pub fn read_frames<R: BufRead>(reader: R) -> impl Iterator<Item = anyhow::Result<Frame>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line_no = index + 1;
            match line {
                Ok(text) if text.trim().is_empty() => None,
                Ok(text) => Some(
                    Frame::from_json(&text).with_context(|| format!("parsing line {}", line_no)),
                ),
                Err(err) => Some(Err(err).with_context(|| format!("reading line {}", line_no))),
            }
        })
}

/// Opens `path` for replay; `-` reads standard input.
pub fn open_frames(path: &Path) -> anyhow::Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("opening frame file {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jointcore::skeleton::Landmark;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn reads_frames_and_skips_blank_lines() {
        let input = "{\"1\": [0.0, 0.0, 0.0]}\n\n{\"8\": [0.0, -1.0, 0.0], \"5\": [0.2, 0.0, 0.0]}\n";
        let frames: Vec<Frame> = read_frames(Cursor::new(input))
            .collect::<anyhow::Result<_>>()
            .unwrap();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].contains(Landmark::Neck));
        assert_eq!(frames[1].len(), 2);
    }

    #[test]
    fn reports_line_of_malformed_frame() {
        let input = "{\"1\": [0.0, 0.0, 0.0]}\n{\"1\": \"oops\"}\n";
        let results: Vec<_> = read_frames(Cursor::new(input)).collect();
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert!(format!("{:#}", err).contains("parsing line 2"));
    }

    #[test]
    fn opens_frame_file_from_disk() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"{\"2\": [0.1, 0.2, 0.3]}\n").unwrap();
        let path = temp.into_temp_path();
        let frames: Vec<_> = read_frames(open_frames(&path).unwrap()).collect();
        assert_eq!(frames.len(), 1);
        assert!(frames[0].as_ref().unwrap().contains(Landmark::RShoulder));
    }
}
