use shotgroup_shared::config::{DistributionConfig, SimulationConfig, TableConfig};
use shotgroup_sim::fit::{self, Family};
use shotgroup_sim::percentile::{ratio_percentiles, ratios};
use shotgroup_sim::runner;
use shotgroup_sim::shots::ShotSampler;
use shotgroup_sim::simulator::{group_statistics, simulate, simulate_with};

fn small_config(n_groups: usize) -> SimulationConfig {
    SimulationConfig {
        n_groups,
        batch_size: 10_000,
        ..SimulationConfig::default()
    }
}

#[test]
fn test_simulation_is_reproducible() {
    let a = simulate(5, 20_000, 42, 5_000).unwrap();
    let b = simulate(5, 20_000, 42, 5_000).unwrap();
    assert_eq!(a.mean_radii, b.mean_radii);
    assert_eq!(a.extreme_spreads, b.extreme_spreads);
}

#[test]
fn test_batching_does_not_change_results() {
    let batched = simulate(5, 100_000, 42, 50_000).unwrap();
    let single = simulate(5, 100_000, 42, 100_000).unwrap();
    assert_eq!(batched.mean_radii, single.mean_radii);
    assert_eq!(batched.extreme_spreads, single.extreme_spreads);
}

#[test]
fn test_group_statistics_non_negative_and_extreme_spread_is_max_pair() {
    let mut sampler = ShotSampler::new(1.0, 7);
    let mut group = vec![[0.0; 2]; 8];
    for _ in 0..2_000 {
        sampler.fill(&mut group);
        let stats = group_statistics(&group);
        assert!(stats.mean_radius >= 0.0);
        assert!(stats.extreme_spread >= 0.0);
        for a in &group {
            for b in &group {
                let d = (a[0] - b[0]).hypot(a[1] - b[1]);
                assert!(
                    stats.extreme_spread >= d - 1e-12,
                    "pair {} > es {}",
                    d,
                    stats.extreme_spread
                );
            }
        }
    }

    let samples = simulate(3, 50_000, 42, 10_000).unwrap();
    assert!(samples.mean_radii.iter().all(|&mr| mr >= 0.0));
    assert!(samples.extreme_spreads.iter().all(|&es| es > 0.0));
}

#[test]
fn test_ratio_is_scale_invariant() {
    let unit = simulate_with(6, &small_config(30_000)).unwrap();
    let doubled_config = SimulationConfig {
        sigma: 2.0,
        ..small_config(30_000)
    };
    let doubled = simulate_with(6, &doubled_config).unwrap();

    // Same stream, every draw doubled: MR and ES double, the ratio is unchanged.
    for i in 0..unit.n_groups() {
        assert!((doubled.mean_radii[i] - 2.0 * unit.mean_radii[i]).abs() < 1e-12);
        assert!((doubled.extreme_spreads[i] - 2.0 * unit.extreme_spreads[i]).abs() < 1e-12);
    }
    let levels = [5.0, 50.0, 95.0];
    let r_unit = ratio_percentiles(&unit.mean_radii, &unit.extreme_spreads, &levels).unwrap();
    let r_doubled =
        ratio_percentiles(&doubled.mean_radii, &doubled.extreme_spreads, &levels).unwrap();
    for (a, b) in r_unit.iter().zip(&r_doubled) {
        assert!((a - b).abs() < 1e-12);
    }

    // Independent stream at sigma = 2: distributions agree within sampling noise.
    let other_config = SimulationConfig {
        sigma: 2.0,
        base_seed: 1_000,
        ..small_config(30_000)
    };
    let other = simulate_with(6, &other_config).unwrap();
    let r_other = ratio_percentiles(&other.mean_radii, &other.extreme_spreads, &levels).unwrap();
    for (a, b) in r_unit.iter().zip(&r_other) {
        assert!((a - b).abs() < 0.01, "{} vs {}", a, b);
    }
}

#[test]
fn test_ratio_medians_by_group_size() {
    let config = SimulationConfig {
        n_groups: 200_000,
        ..SimulationConfig::default()
    };
    let median = |n: usize| {
        let samples = simulate_with(n, &config).unwrap();
        ratio_percentiles(&samples.mean_radii, &samples.extreme_spreads, &[50.0]).unwrap()[0]
    };
    let m3 = median(3);
    let m5 = median(5);
    let m10 = median(10);

    for m in [m3, m5, m10] {
        assert!(m > 0.0 && m < 1.0, "median {}", m);
    }
    assert!((0.355..0.385).contains(&m5), "n=5 median {}", m5);
    assert!(m3 > m5 && m5 > m10, "medians {} {} {}", m3, m5, m10);
}

#[test]
fn test_ratios_are_finite_for_simulated_groups() {
    let samples = simulate(4, 50_000, 42, 10_000).unwrap();
    let values = ratios(&samples.mean_radii, &samples.extreme_spreads).unwrap();
    assert!(values.iter().all(|r| r.is_finite() && *r > 0.0 && *r < 1.0));
}

#[test]
fn test_table_is_monotone() {
    let table_config = TableConfig {
        group_sizes: (3..=10).collect(),
        ..TableConfig::default()
    };
    let (table, ratios) =
        runner::generate_table(&table_config, &small_config(20_000), Some(2)).unwrap();

    assert_eq!(table.n_rows(), 20);
    assert_eq!(ratios.len(), 8);
    for &n in &table_config.group_sizes {
        let mut prev = [f64::NEG_INFINITY; 3];
        for row in &table.rows {
            let cell = row.get(n).unwrap();
            assert!(cell[0] <= cell[1] && cell[1] <= cell[2], "n={} es={} {:?}", n, row.es, cell);
            for k in 0..3 {
                assert!(cell[k] > prev[k], "n={} es={} not increasing", n, row.es);
            }
            prev = cell;
        }
    }

    let json = serde_json::to_value(&table).unwrap();
    assert_eq!(json["1.0"]["5"].as_array().unwrap().len(), 3);
}

#[test]
fn test_parallel_runner_matches_sequential() {
    let config = small_config(10_000);
    let parallel = runner::run_ratio_percentiles(&[3, 4, 5, 6], &config, Some(2)).unwrap();
    assert_eq!(parallel.len(), 4);
    for (&n, r) in &parallel {
        assert_eq!(*r, runner::ratio_percentiles_for(n, &config).unwrap());
    }
}

#[test]
fn test_invalid_group_size_aborts_runner() {
    let err = runner::run_ratio_percentiles(&[3, 1], &small_config(1_000), Some(1)).unwrap_err();
    assert!(err.to_string().contains("n_shots"), "{}", err);
}

#[test]
fn test_mean_radius_fit_sanity() {
    let report = runner::analyze_mean_radius(5, &small_config(50_000), 500).unwrap();
    assert_eq!(report.n_groups, 50_000);
    assert_eq!(report.sample.len(), 50_000);
    assert!(report.fit.normal.loc.abs() < 1e-9);
    assert!((report.fit.normal.scale - 1.0).abs() < 1e-9);
    assert!(report.summary.mean.abs() < 1e-9);
    assert_eq!(report.qq_normal.len(), 500);
    assert_eq!(report.qq_rayleigh.len(), 500);
    assert!(report.fit.rayleigh.loc < -1.0);

    for gof in [report.fit.normal_gof, report.fit.rayleigh_gof] {
        assert!((0.0..=1.0).contains(&gof.statistic));
        assert!((0.0..=1.0).contains(&gof.p_value));
    }
    let better = report.better_fit;
    let (winner, loser) = match better {
        Family::Normal => (report.fit.normal_gof, report.fit.rayleigh_gof),
        Family::Rayleigh => (report.fit.rayleigh_gof, report.fit.normal_gof),
    };
    assert!(winner.statistic <= loser.statistic);
}

#[test]
fn test_distribution_analysis_per_group_size() {
    let dist = DistributionConfig {
        group_sizes: vec![3, 10],
        qq_points: 100,
    };
    let reports = runner::run_distribution_analysis(&dist, &small_config(5_000), Some(2)).unwrap();
    assert_eq!(reports.iter().map(|r| r.n_shots).collect::<Vec<_>>(), vec![3, 10]);

    let record = serde_json::to_value(&reports[0]).unwrap();
    assert!(record.get("sample").is_none());
    assert!(record["fit"]["normal_gof"]["statistic"].is_number());
}

#[test]
fn test_ks_statistic_bounds_on_poor_fit() {
    let sample: Vec<f64> = (0..1_000).map(|i| 100.0 + i as f64).collect();
    let params = shotgroup_shared::result::DistParams {
        loc: 0.0,
        scale: 1.0,
    };
    let gof = fit::goodness_of_fit(&sample, Family::Normal, params).unwrap();
    assert!((gof.statistic - 1.0).abs() < 1e-12);
    assert!(gof.p_value >= 0.0 && gof.p_value < 1e-10);
}
