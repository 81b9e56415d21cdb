use std::io::{self, Write};

use crate::top_k::RankedEntry;
use crate::util::utf8;

/// Writes the ranked table: a header row, then one tab-separated row
/// per entry.
pub fn write_ranking<W: Write>(out: &mut W, ranking: &[RankedEntry]) -> io::Result<()> {
    writeln!(out, "Rank\tURL\tCount")?;
    for entry in ranking {
        let key = utf8(&entry.key)?;
        writeln!(out, "{}\t{}\t{}", entry.rank, key, entry.count)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn exact_table_format() {
        let ranking = vec![
            RankedEntry {
                key: Bytes::from_static(b"http://a"),
                count: 3,
                rank: 1,
            },
            RankedEntry {
                key: Bytes::from_static(b"http://b"),
                count: 2,
                rank: 2,
            },
        ];

        let mut out = Vec::new();
        write_ranking(&mut out, &ranking).unwrap();
        assert_eq!(
            out,
            b"Rank\tURL\tCount\n1\thttp://a\t3\n2\thttp://b\t2\n"
        );
    }

    #[test]
    fn header_only_for_empty_ranking() {
        let mut out = Vec::new();
        write_ranking(&mut out, &[]).unwrap();
        assert_eq!(out, b"Rank\tURL\tCount\n");
    }

    #[test]
    fn invalid_utf8_key_is_an_error() {
        let ranking = vec![RankedEntry {
            key: Bytes::from_static(b"\xff\xfe"),
            count: 1,
            rank: 1,
        }];
        let mut out = Vec::new();
        assert!(write_ranking(&mut out, &ranking).is_err());
    }
}
