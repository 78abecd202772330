//! Playoff segmentation of a month of schedule rows

use crate::{GameType, RawGameRow, TaggedRow};

/// Tag a month of rows with their season phase.
///
/// Rows before the first "Playoffs" marker row are regular season, rows
/// after it are playoffs and the marker itself is dropped. Without a marker
/// every row is regular season. Row order is preserved.
pub fn split_playoffs(rows: Vec<RawGameRow>) -> Vec<TaggedRow> {
    let marker = rows.iter().position(RawGameRow::is_playoffs_marker);

    rows.into_iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let game_type = match marker {
                Some(k) if i == k => return None,
                Some(k) if i > k => GameType::Playoffs,
                _ => GameType::RegularSeason,
            };
            Some(TaggedRow { row, game_type })
        })
        .collect()
}

/// Segment each month independently and concatenate them in the given order
pub fn split_season<I>(months: I) -> Vec<TaggedRow>
where
    I: IntoIterator<Item = Vec<RawGameRow>>,
{
    months.into_iter().flat_map(split_playoffs).collect()
}
