//! # Base64 Vocab IO

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use base64::{Engine, prelude::BASE64_STANDARD};

use crate::{
    BPTError,
    BPTResult,
    types::{Symbol, TokenType},
    vocab::SymbolVocab,
};

/// Load a [`SymbolVocab`] from a base64 vocab file.
///
/// ## Arguments
/// * `path` - The path to the vocab file.
pub fn load_base64_vocab_path<T, P>(path: P) -> BPTResult<SymbolVocab<T>>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let reader = BufReader::new(File::open(path)?);
    read_base64_vocab(reader)
}

/// Read a [`SymbolVocab`] from a base64 vocab reader.
///
/// Blank lines are skipped.
///
/// ## Arguments
/// * `reader` - The line reader.
pub fn read_base64_vocab<T, R>(reader: R) -> BPTResult<SymbolVocab<T>>
where
    T: TokenType,
    R: BufRead,
{
    let mut pairs: Vec<(Symbol, T)> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        let invalid = |msg: &str| BPTError::InvalidVocab(format!("line {}: {msg}", line_no + 1));

        let (encoded, id) = line
            .split_once(' ')
            .ok_or_else(|| invalid("expected `<base64> <id>`"))?;

        let bytes = BASE64_STANDARD.decode(encoded)?;
        let symbol = String::from_utf8(bytes).map_err(|_| invalid("symbol is not UTF-8"))?;

        let token = id
            .parse::<u64>()
            .ok()
            .and_then(T::from_u64)
            .ok_or_else(|| invalid("invalid token id"))?;

        pairs.push((Symbol::from(symbol), token));
    }

    SymbolVocab::from_symbol_tokens(pairs)
}

/// Save a [`SymbolVocab`] to a base64 vocab file.
///
/// ## Arguments
/// * `vocab` - The vocabulary to save.
/// * `path` - The path to the vocab file.
pub fn save_base64_vocab_path<T, P>(
    vocab: &SymbolVocab<T>,
    path: P,
) -> BPTResult<()>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    write_base64_vocab(vocab, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a [`SymbolVocab`] to a writer, in token order.
///
/// ## Arguments
/// * `vocab` - The vocabulary to write.
/// * `writer` - The target writer.
pub fn write_base64_vocab<T, W>(
    vocab: &SymbolVocab<T>,
    writer: &mut W,
) -> BPTResult<()>
where
    T: TokenType,
    W: Write,
{
    for (token, symbol) in vocab.iter() {
        writeln!(
            writer,
            "{} {}",
            BASE64_STANDARD.encode(symbol.as_bytes()),
            token.to_u64().unwrap_or_default()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tempdir::TempDir;

    use super::*;

    fn sample_vocab() -> SymbolVocab<u32> {
        SymbolVocab::assemble(
            ["a", "b", "ab", "\u{2581}", "ab\u{2581}", "é"]
                .into_iter()
                .map(Symbol::from),
            "<unk>",
        )
        .unwrap()
    }

    #[test]
    fn test_save_load() {
        let vocab = sample_vocab();

        let tmp_dir = TempDir::new("bpetrie_vocab_io").unwrap();
        let path = tmp_dir.path().join("vocab.bpt");

        save_base64_vocab_path(&vocab, &path).unwrap();
        let loaded: SymbolVocab<u32> = load_base64_vocab_path(&path).unwrap();

        assert_eq!(loaded, vocab);
        assert_eq!(loaded.lookup_token("ab\u{2581}"), vocab.lookup_token("ab\u{2581}"));
    }

    #[test]
    fn test_write_format() {
        let vocab = SymbolVocab::<u16>::assemble([Symbol::from("a")], "<unk>").unwrap();

        let mut buf: Vec<u8> = Vec::new();
        write_base64_vocab(&vocab, &mut buf).unwrap();

        assert_eq!(String::from_utf8(buf).unwrap(), "PHVuaz4= 0\nYQ== 1\n");
    }

    #[test]
    fn test_read_errors() {
        let bad_line = read_base64_vocab::<u32, _>(Cursor::new("PHVuaz4=\n"));
        assert!(matches!(bad_line, Err(BPTError::InvalidVocab(_))));

        let bad_b64 = read_base64_vocab::<u32, _>(Cursor::new("!!! 0\n"));
        assert!(matches!(bad_b64, Err(BPTError::Base64(_))));

        let bad_id = read_base64_vocab::<u8, _>(Cursor::new("PHVuaz4= 0\nYQ== 999\n"));
        assert!(matches!(bad_id, Err(BPTError::InvalidVocab(_))));

        let ok = read_base64_vocab::<u8, _>(Cursor::new("\nYQ== 1\nPHVuaz4= 0\n\n")).unwrap();
        assert_eq!(ok.lookup_token("a"), Some(1));
    }
}
