//! Properties of splitting and rendering over generated datasets.
//!
//! Cells are drawn from text that needs quoting (commas, quotes, newlines)
//! as well as plain values, so rendering is exercised on both paths.

use csv::StringRecord;
use csv_splitter::chunking::{chunk_file_name, render, split, ChunkSize};
use csv_splitter::ingest::parse;
use csv_splitter::Dataset;
use proptest::prelude::*;

const CELL: &str = "[a-zA-Z0-9 ,\"\né]{0,6}";

fn dataset_strategy() -> impl Strategy<Value = Dataset> {
    (1usize..5)
        .prop_flat_map(|cols| {
            (
                prop::collection::vec(CELL, cols),
                prop::collection::vec(prop::collection::vec(CELL, cols), 0..120),
            )
        })
        .prop_map(|(headers, rows)| {
            Dataset::from_records(
                StringRecord::from(headers),
                rows.into_iter().map(StringRecord::from).collect(),
            )
            .expect("generated rows are rectangular")
        })
}

fn chunk_size_strategy() -> impl Strategy<Value = ChunkSize> {
    (1usize..40).prop_map(|n| ChunkSize::new(n).expect("non-zero"))
}

proptest! {
    #[test]
    fn concatenated_chunks_reproduce_rows(dataset in dataset_strategy(), size in chunk_size_strategy()) {
        let rejoined: Vec<StringRecord> = split(&dataset, size)
            .iter()
            .flat_map(|chunk| chunk.rows().iter().cloned())
            .collect();

        prop_assert_eq!(rejoined.as_slice(), dataset.rows());
    }

    #[test]
    fn only_the_last_chunk_may_be_short(dataset in dataset_strategy(), size in chunk_size_strategy()) {
        let chunks = split(&dataset, size);
        let s = size.get();

        if let Some((last, full)) = chunks.split_last() {
            for chunk in full {
                prop_assert_eq!(chunk.row_count(), s);
            }
            let expected_last = match dataset.row_count() % s {
                0 => s,
                rem => rem,
            };
            prop_assert_eq!(last.row_count(), expected_last);
        } else {
            prop_assert_eq!(dataset.row_count(), 0);
        }
    }

    #[test]
    fn chunk_count_is_ceiling_division(dataset in dataset_strategy(), size in chunk_size_strategy()) {
        let expected = dataset.row_count().div_ceil(size.get());
        prop_assert_eq!(split(&dataset, size).len(), expected);
    }

    #[test]
    fn splitting_is_deterministic(dataset in dataset_strategy(), size in chunk_size_strategy()) {
        let describe = |dataset: &Dataset| -> Vec<(usize, usize, String)> {
            split(dataset, size)
                .iter()
                .map(|c| (c.start(), c.row_count(), chunk_file_name("input.csv", c.part_number())))
                .collect()
        };

        prop_assert_eq!(describe(&dataset), describe(&dataset));
    }

    #[test]
    fn rendered_chunks_parse_back_to_themselves(dataset in dataset_strategy(), size in chunk_size_strategy()) {
        for chunk in split(&dataset, size) {
            for terminator in [csv::Terminator::CRLF, csv::Terminator::Any(b'\n')] {
                let bytes = render(&chunk, terminator).expect("render failed");
                let reparsed = parse(&bytes).expect("rendered chunk should parse");

                prop_assert_eq!(reparsed.headers(), chunk.headers());
                prop_assert_eq!(reparsed.rows(), chunk.rows());
            }
        }
    }
}
