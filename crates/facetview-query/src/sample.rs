//! Bundled sample: ten music tracks with `title`, `artist` and `genre`.
//!
//! Pairs with [`BrowserConfig::songs`](crate::BrowserConfig::songs).

use crate::record::{Record, RecordSource};

const SONGS: [(&str, &str, &str); 10] = [
    ("All Along the Watchtower", "Jimi Hendrix", "Rock"),
    ("Bad Guy", "Billie Eilish", "Pop"),
    ("Dancing Queen", "ABBA", "Pop"),
    ("DNA.", "Kendrick Lamar", "Hip-Hop"),
    ("Happier Than Ever", "Billie Eilish", "Pop"),
    ("HUMBLE.", "Kendrick Lamar", "Hip-Hop"),
    ("Mamma Mia", "ABBA", "Pop"),
    ("Purple Haze", "Jimi Hendrix", "Rock"),
    ("Stairway to Heaven", "Led Zeppelin", "Rock"),
    ("Whole Lotta Love", "Led Zeppelin", "Rock"),
];

/// The sample tracks as records, in catalogue order.
pub fn song_records() -> Vec<Record> {
    SONGS
        .iter()
        .map(|&(title, artist, genre)| {
            Record::from_pairs([("title", title), ("artist", artist), ("genre", genre)])
        })
        .collect()
}

/// The sample tracks as a record source.
pub fn songs() -> RecordSource {
    // Every sample record has the same three fields.
    match RecordSource::new(song_records()) {
        Ok(source) => source,
        Err(_) => unreachable!("sample records are homogeneous"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_tracks_three_fields() {
        let source = songs();
        assert_eq!(source.len(), 10);
        assert_eq!(source.fields(), &["artist", "genre", "title"]);
    }

    #[test]
    fn facet_values() {
        let source = songs();
        assert_eq!(
            source.distinct_values("genre"),
            vec!["Hip-Hop", "Pop", "Rock"]
        );
        assert_eq!(
            source.distinct_values("artist"),
            vec![
                "ABBA",
                "Billie Eilish",
                "Jimi Hendrix",
                "Kendrick Lamar",
                "Led Zeppelin"
            ]
        );
    }
}
