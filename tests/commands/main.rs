//! Integration tests for [`commands::run`]

/// Integration tests for [`commands::run`]
#[cfg(test)]
mod tests {

    use clap::Parser as _;
    use indoc::indoc;
    use nanoduplex_core::batch::BatchSummary;
    use nanoduplex_core::commands;
    use std::{env, fs};
    use uuid::Uuid;

    #[test]
    fn run_commands_map_pairs() {
        let pairs_path = env::temp_dir().join(format!("nanoduplex_test_{}.tsv", Uuid::new_v4()));
        let pairs = indoc! {"
            read_id\tsimplex\tduplex
            r1\tTTTTTACGTACGTACG\tACGTACGTACG
            r2\tACGTACGTACG\tTCGTTACGTACGTACG
            r3\tAAAAAAAA\tCCCCCCCC
            r4\tACGTNACGT\tACGTACGT
            r5\tGGGTACGTACG\tTCGTTACGTACGTACG
        "};
        fs::write(&pairs_path, pairs).expect("failed to write pairs");

        // Construct CLI
        let cli = commands::Cli::parse_from([
            "",
            "map-pairs",
            pairs_path.to_str().expect("utf8 path"),
            "--threads",
            "2",
        ]);

        // Capture output to buffer
        let mut output = Vec::new();
        commands::run(cli, &mut output).expect("no error");
        fs::remove_file(&pairs_path).expect("failed to clean up pairs");

        let output = String::from_utf8(output).expect("Invalid UTF-8");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);

        let expected_ids = ["r1", "r2", "r5"];
        let expected_offsets = [0, 5, 7];
        for (line, (id, offset)) in lines.iter().zip(expected_ids.iter().zip(expected_offsets)) {
            let value: serde_json::Value = serde_json::from_str(line).expect("valid JSON");
            assert_eq!(value["read_id"], *id);
            assert_eq!(value["mapping"]["duplex_offset"], offset);
        }

        let summary_line = lines[3].strip_prefix("# ").expect("summary line");
        let summary: BatchSummary = serde_json::from_str(summary_line).expect("valid JSON");
        assert_eq!(summary.num_pairs, 5);
        assert_eq!(summary.num_mapped, 3);
        assert_eq!(summary.num_unalignable, 1);
        assert_eq!(summary.num_input_error, 1);
        assert_eq!(summary.num_coordinate_error, 0);
    }

    #[test]
    fn run_commands_map_pairs_with_max_len() {
        let pairs_path = env::temp_dir().join(format!("nanoduplex_test_{}.tsv", Uuid::new_v4()));
        let pairs = indoc! {"
            read_id\tsimplex\tduplex
            r1\tTTTTTACGTACGTACG\tACGTACGTACG
            r2\tACGTACGTACG\tACGTACGTACG
        "};
        fs::write(&pairs_path, pairs).expect("failed to write pairs");

        let cli = commands::Cli::parse_from([
            "",
            "map-pairs",
            pairs_path.to_str().expect("utf8 path"),
            "--max-len",
            "12",
        ]);
        let mut output = Vec::new();
        commands::run(cli, &mut output).expect("no error");
        fs::remove_file(&pairs_path).expect("failed to clean up pairs");

        let output = String::from_utf8(output).expect("Invalid UTF-8");
        assert!(output.starts_with("{\"read_id\":\"r2\""));
        assert!(output.ends_with(
            "# {\"num_pairs\":2,\"num_mapped\":1,\"num_input_error\":1,\"num_unalignable\":0,\"num_coordinate_error\":0}\n"
        ));
    }

    #[test]
    fn run_commands_map_pretty() {
        let cli = commands::Cli::parse_from(["", "map", "ACGTACGTACG", "ACGTACGTACG", "--pretty"]);
        let mut output = Vec::new();
        commands::run(cli, &mut output).expect("no error");
        let output = String::from_utf8(output).expect("Invalid UTF-8");
        assert!(output.contains("\n  \"duplex_offset\": 0,\n"));
    }

    #[test]
    fn run_commands_map_pairs_missing_file_fails() {
        let cli = commands::Cli::parse_from([
            "",
            "map-pairs",
            "/nonexistent/nanoduplex/pairs.tsv",
        ]);
        assert!(commands::run(cli, Vec::new()).is_err());
    }
}
