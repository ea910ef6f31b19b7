//! Integration tests for the promiscuity analyses.

use approx::assert_relative_eq;
use pfam_promiscuity::prelude::*;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

/// Three species sharing a few domains.
///
/// - HUMAN and MOUSE share the kinase/SH2/SH3 neighbourhood
/// - YEAST only has its own domains plus one isolated singleton
fn write_records() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "species\tprotein\tarchitecture").unwrap();
    let rows = [
        ("HUMAN", "H1", "SH3~SH2~Pkinase"),
        ("HUMAN", "H2", "SH2~Pkinase"),
        ("HUMAN", "H3", "PH~SH3"),
        ("HUMAN", "H4", "Ig~Ig~Ig"),
        ("MOUSE", "M1", "SH3~SH2~Pkinase"),
        ("MOUSE", "M2", "PH~SH2"),
        ("MOUSE", "M3", "Ig"),
        ("YEAST", "Y1", "Ras~RhoGAP"),
        ("YEAST", "Y2", "WD40~WD40~F-box"),
        ("YEAST", "Y3", "Orphan"),
    ];
    for (species, protein, arch) in rows {
        writeln!(file, "{}\t{}\t{}", species, protein, arch).unwrap();
    }
    file.flush().unwrap();
    file
}

fn load_records() -> RecordTable {
    let file = write_records();
    RecordTable::from_tsv(file.path()).unwrap()
}

fn flat_rows(output: &AnalysisOutput) -> Vec<Vec<String>> {
    let mut buf = Vec::new();
    output.write_tsv(&mut buf).unwrap();
    String::from_utf8(buf)
        .unwrap()
        .lines()
        .map(|l| l.split('\t').map(String::from).collect())
        .collect()
}

#[test]
fn test_flat_report_from_tsv() {
    let records = load_records();
    assert_eq!(records.len(), 10);

    let output = Analysis::new().run(records).unwrap();
    let rows = flat_rows(&output);

    assert_eq!(
        rows[0],
        vec![
            "species",
            "domain",
            "num_bigrams",
            "domain_promiscuity",
            "singleton_promiscuity_cutoff",
            "IAF_d",
            "IV_d",
            "weight_score"
        ]
    );

    // Orphan and MOUSE's lone Ig have no bigrams and are left out
    assert!(rows.iter().all(|r| r[1] != "Orphan"));
    assert!(!rows.iter().any(|r| r[0] == "MOUSE" && r[1] == "Ig"));

    // Species then domain order
    let keys: Vec<(String, String)> = rows[1..]
        .iter()
        .map(|r| (r[0].clone(), r[1].clone()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);

    // HUMAN SH2 neighbours SH3 and Pkinase
    let sh2 = rows[1..]
        .iter()
        .find(|r| r[0] == "HUMAN" && r[1] == "SH2")
        .unwrap();
    assert_eq!(sh2[2], "2");
    let iv: f64 = sh2[6].parse().unwrap();
    assert_relative_eq!(iv, 0.5, epsilon = 1e-12);
}

#[test]
fn test_worked_example() {
    let records = vec![
        ArchitectureRecord::new("S", "P1", "D1~D2"),
        ArchitectureRecord::new("S", "P2", "D2~D3"),
    ];
    let graph = BigramGraph::build(records, DEFAULT_DELIMITER);

    let d2 = graph.domain("S", "D2").unwrap();
    assert_eq!(d2.appearances(), 2);
    assert_eq!(d2.n_distinct_neighbours(), 2);

    let m = compute_promiscuity(&graph, "S", "D2").unwrap();
    assert_eq!(m.num_bigrams, 2);
    assert_relative_eq!(m.iaf, 0.0, epsilon = 1e-12);
    assert_relative_eq!(m.iv, 0.5, epsilon = 1e-12);
    assert_relative_eq!(m.weight_score, 0.0, epsilon = 1e-12);
}

#[test]
fn test_record_order_does_not_matter() {
    let records = load_records();
    let mut reversed: Vec<ArchitectureRecord> = records.records().to_vec();
    reversed.reverse();

    let a = graph_metrics(&BigramGraph::build(records, '~')).unwrap();
    let b = graph_metrics(&BigramGraph::build(reversed, '~')).unwrap();

    assert_eq!(a.len(), b.len());
    for (sa, sb) in a.iter().zip(b.iter()) {
        assert_eq!(sa.metrics, sb.metrics);
        assert_eq!(sa.skipped, sb.skipped);
    }
}

#[test]
fn test_top_n_ranking() {
    let output = Analysis::new()
        .top_n(RankBy::Promiscuity, 2)
        .run(load_records())
        .unwrap();

    let ranking = match output {
        AnalysisOutput::TopN(r) => r,
        other => panic!("unexpected output {:?}", other),
    };

    // Two domains per species at most
    let total: usize = ranking.entries.iter().map(|e| e.n_species).sum();
    assert!(total <= 6);

    // Counts never increase down the list
    for pair in ranking.entries.windows(2) {
        assert!(pair[0].n_species >= pair[1].n_species);
    }

    let mut buf = Vec::new();
    ranking.write_tsv(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.starts_with("domain\tnum_species\tavg_domain_promiscuity\tavg_num_bigrams\n"));
}

#[test]
fn test_distance_matrix() {
    let output = Analysis::new().distance(25).run(load_records()).unwrap();
    let matrix = match output {
        AnalysisOutput::Distance(m) => m,
        other => panic!("unexpected output {:?}", other),
    };

    assert_eq!(matrix.species(), &["HUMAN", "MOUSE", "YEAST"]);
    for i in 0..matrix.len() {
        assert_eq!(matrix.get(i, i), 0.0);
        for j in 0..matrix.len() {
            assert_eq!(matrix.get(i, j), matrix.get(j, i));
        }
    }

    // No shared domains with yeast
    assert_relative_eq!(matrix.distance("HUMAN", "YEAST").unwrap(), 1.0, epsilon = 1e-12);
    assert!(matrix.distance("HUMAN", "MOUSE").unwrap() < 1.0);

    let mut buf = Vec::new();
    matrix.write_tsv(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(text.lines().next(), Some("3"));
    assert_eq!(text.lines().count(), 4);
}

#[test]
fn test_run_from_config_file() {
    let mut config_file = NamedTempFile::new().unwrap();
    writeln!(
        config_file,
        concat!(
            "name: weight-scores\nspecies:\n  - HUMAN\n  - MOUSE\n",
            "report:\n  kind: top_n\n  n: 3\n  rank_by: weight_score"
        )
    )
    .unwrap();
    config_file.flush().unwrap();

    let config = AnalysisConfig::from_file(config_file.path()).unwrap();
    assert_eq!(config.delimiter, '~');

    let output = Analysis::from_config(&config).run(load_records()).unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("ranking.tsv");
    output.to_tsv(&out_path).unwrap();

    let text = std::fs::read_to_string(&out_path).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(header, "domain\tnum_species\tavg_weight_score\tavg_num_bigrams");
    assert!(!text.contains("RhoGAP"));
}

#[test]
fn test_profile() {
    let graph = BigramGraph::build(load_records(), '~');
    let profile = profile_graph(&graph);

    assert_eq!(profile.n_species, 3);
    assert_eq!(profile.n_architectures(), 10);

    let yeast = profile.species.iter().find(|s| s.species == "YEAST").unwrap();
    assert_eq!(yeast.n_multi_domain, 2);
    assert_eq!(yeast.n_proteins, 3);

    let text = profile.to_string();
    assert!(text.contains("Bigram Graph Profile"));
    let json = serde_json::to_string(&profile).unwrap();
    assert!(json.contains("\"n_species\":3"));
}

#[test]
fn test_missing_column_is_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "species\tarchitecture").unwrap();
    writeln!(file, "HUMAN\tSH2~SH3").unwrap();
    file.flush().unwrap();

    let err = RecordTable::from_tsv(file.path()).unwrap_err();
    assert!(matches!(err, PromiscuityError::MissingColumn(c) if c == "protein"));
}

#[test]
fn test_exclusive_domains() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "species\tpfamA_id\tpfamA_acc\tpathogen_type").unwrap();
    let rows = [
        ("s1", "Pkinase", "PF00069", 0),
        ("s2", "Pkinase", "PF00069", 1),
        ("s3", "Zn_clus", "PF00172", 2),
        ("s4", "MFS_1", "PF07690", 3),
        ("s5", "MFS_1", "PF07690", 2),
        ("s6", "AhpC-TSA", "PF00578", 4),
    ];
    for (species, domain, acc, code) in rows {
        writeln!(file, "{}\t{}\t{}\t{}", species, domain, acc, code).unwrap();
    }
    file.flush().unwrap();

    let columns = FeatureColumns::new("pfamA_id").with_descriptors(["pfamA_acc"]);
    let table = PathogenTable::from_tsv(file.path(), columns).unwrap();
    assert_eq!(table.len(), 6);

    let strict = exclusive_features(&table, false);
    let names: Vec<&str> = strict.features.iter().map(|f| f.feature.as_str()).collect();
    assert_eq!(names, vec!["Zn_clus", "AhpC-TSA"]);

    let collapsed = exclusive_features(&table, true);
    let names: Vec<&str> = collapsed.features.iter().map(|f| f.feature.as_str()).collect();
    assert_eq!(names, vec!["Pkinase", "Zn_clus", "AhpC-TSA"]);

    let mut counts_file = NamedTempFile::new().unwrap();
    writeln!(
        counts_file,
        "pathogen_type\tnum_species\tnum_strains\n0\t1\t2\n1\t2\t3\n2\t4\t5\n4\t1\t1"
    )
    .unwrap();
    counts_file.flush().unwrap();
    let counts = group_counts_from_tsv(counts_file.path()).unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("exclusive.tsv");
    collapsed.with_group_counts(counts).to_tsv(&out_path).unwrap();

    let text = std::fs::read_to_string(&out_path).unwrap();
    let expected = concat!(
        "pathogen_type\tpfamA_id\tpfamA_acc\tnum_species\tnum_strains\n",
        "0\tPkinase\tPF00069\t3\t5\n",
        "2\tZn_clus\tPF00172\t4\t5\n",
        "4\tAhpC-TSA\tPF00578\t1\t1\n"
    );
    assert_eq!(text, expected);
}

#[test]
fn test_core_domains_by_rank() {
    let mut taxonomy = NamedTempFile::new().unwrap();
    writeln!(taxonomy, "phylum\tsubphylum\torder\tgenus\tspecies\tstrains").unwrap();
    let strains = [
        ("Saccharomycotina", "Saccharomycetales", "Candida", "C. albicans", "SC5314"),
        ("Saccharomycotina", "Saccharomycetales", "Candida", "C. albicans", "WO-1"),
        ("Saccharomycotina", "Saccharomycetales", "Candida", "C. glabrata", "CBS138"),
        ("Pezizomycotina", "Eurotiales", "Aspergillus", "A. fumigatus", "Af293"),
    ];
    for (subphylum, order, genus, species, strain) in strains {
        writeln!(
            taxonomy,
            "Ascomycota\t{}\t{}\t{}\t{}\t{}",
            subphylum, order, genus, species, strain
        )
        .unwrap();
    }
    taxonomy.flush().unwrap();

    let mut occurrences = NamedTempFile::new().unwrap();
    writeln!(
        occurrences,
        "pfamA_id\tphylum\tsubphylum\torder\tgenus\tspecies\tstrains"
    )
    .unwrap();
    for (domain, species, strain) in [
        ("Hyphal_reg_CWP", "C. albicans", "SC5314"),
        ("Hyphal_reg_CWP", "C. albicans", "WO-1"),
        ("Hyphal_reg_CWP", "C. albicans", "WO-1"),
        ("Epimerase", "C. albicans", "SC5314"),
        ("Epimerase", "C. glabrata", "CBS138"),
    ] {
        writeln!(
            occurrences,
            "{}\tAscomycota\tSaccharomycotina\tSaccharomycetales\tCandida\t{}\t{}",
            domain, species, strain
        )
        .unwrap();
    }
    occurrences.flush().unwrap();

    let counts = TaxonomyCounts::from_tsv(taxonomy.path()).unwrap();
    assert_eq!(counts.n_strains(), 4);
    let table = TaxonTable::from_tsv(occurrences.path(), FeatureColumns::new("pfamA_id")).unwrap();
    let report = core_features(&table, &counts);

    let names: Vec<&str> = report.features.iter().map(|f| f.feature.as_str()).collect();
    assert_eq!(names, vec!["Epimerase", "Hyphal_reg_CWP"]);

    let hyphal = report.get("Hyphal_reg_CWP").unwrap();
    assert_eq!(hyphal.n_strains, 2);
    let species = hyphal.level(TaxonLevel::Species).unwrap();
    assert_eq!(species.taxon.as_deref(), Some("C. albicans"));
    assert!(species.core);
    assert!(!hyphal.level(TaxonLevel::Genus).unwrap().core);

    let epimerase = report.get("Epimerase").unwrap();
    assert!(!epimerase.level(TaxonLevel::Species).unwrap().is_exclusive());
    let genus = epimerase.level(TaxonLevel::Genus).unwrap();
    assert_eq!(genus.taxon.as_deref(), Some("Candida"));
    assert!(!genus.core);

    let mut buf = Vec::new();
    report.write_tsv(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some(concat!(
            "pfamA_id\tphylum\tcore\tsubphylum\tcore\torder\tcore",
            "\tgenus\tcore\tspecies\tcore"
        ))
    );
    assert_eq!(
        lines.next(),
        Some(concat!(
            "Epimerase\tAscomycota\t0\tSaccharomycotina\t0",
            "\tSaccharomycetales\t0\tCandida\t0\t0\t0"
        ))
    );
}
