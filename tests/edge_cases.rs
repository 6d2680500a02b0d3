use geo::{Coord, LineString};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use std::sync::Arc;
use std::thread;
use wasserwege::engine;
use wasserwege::query::sort_crossings;
use wasserwege::{FeatureRecord, Polyline, SharedDataset, WaterwayError, load_dataset};

fn c(x: f64, y: f64) -> Coord {
    Coord { x, y }
}

fn random_dataset(rng: &mut XorShiftRng, count: i64) -> Vec<FeatureRecord> {
    (0..count)
        .map(|id| {
            let vertices = rng.gen_range(2..8);
            let mut x = rng.gen_range(0.0..100.0);
            let mut y = rng.gen_range(0.0..100.0);
            let coords: Vec<Coord> = (0..vertices)
                .map(|_| {
                    x += rng.gen_range(-5.0..5.0);
                    y += rng.gen_range(-5.0..5.0);
                    c(x, y)
                })
                .collect();
            FeatureRecord::from_line(id, "stream", LineString::new(coords))
        })
        .collect()
}

fn random_track(rng: &mut XorShiftRng) -> Vec<Coord> {
    let vertices = rng.gen_range(2..22);
    (0..vertices)
        .map(|_| c(rng.gen_range(-10.0..110.0), rng.gen_range(-10.0..110.0)))
        .collect()
}

/// Pruning through the index never loses a crossing the full scan finds.
#[test]
fn test_pruning_matches_full_scan() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = XorShiftRng::seed_from_u64(42);
    let dataset = load_dataset(random_dataset(&mut rng, 500)).expect("dataset");

    let mut total = 0;
    for _ in 0..50 {
        let track = random_track(&mut rng);
        let polyline = Polyline::new(track.clone()).expect("track");

        let mut scanned = engine::scan_all(dataset.store(), &polyline).expect("scan");
        sort_crossings(&mut scanned);

        let result = dataset.query(&track).expect("query");
        assert_eq!(result.crossings, scanned);
        total += scanned.len();
    }

    assert!(total > 0, "random tracks should cross something");
}

/// Touching only at a shared endpoint still counts as a crossing.
#[test]
fn test_endpoint_touch_is_a_crossing() {
    let dataset = load_dataset(vec![FeatureRecord::from_line(
        7,
        "canal",
        LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]),
    )])
    .expect("dataset");

    let result = dataset.query(&[c(10.0, 0.0), c(15.0, 5.0)]).expect("query");
    assert_eq!(result.feature_ids(), vec![7]);
    assert_eq!(result.crossings[0].intersection.points, vec![c(10.0, 0.0)]);
}

/// A track whose bounding box overlaps a feature without touching it.
#[test]
fn test_bbox_overlap_without_intersection() {
    let dataset = load_dataset(vec![FeatureRecord::from_line(
        1,
        "river",
        LineString::from(vec![(0.0, 0.0), (10.0, 10.0)]),
    )])
    .expect("dataset");

    let result = dataset.query(&[c(6.0, 0.0), c(10.0, 4.0)]).expect("query");
    assert!(result.is_empty());
}

/// Crossing the same waterway several times yields one result with every point.
#[test]
fn test_repeated_crossings_collapse_into_one_feature() {
    let dataset = load_dataset(vec![FeatureRecord::from_line(
        3,
        "river",
        LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]),
    )])
    .expect("dataset");

    let track = [c(1.0, 1.0), c(3.0, -1.0), c(5.0, 1.0), c(7.0, -1.0)];
    let result = dataset.query(&track).expect("query");

    assert_eq!(result.len(), 1);
    assert_eq!(
        result.crossings[0].intersection.points,
        vec![c(2.0, 0.0), c(4.0, 0.0), c(6.0, 0.0)]
    );
}

/// Concurrent readers see a consistent snapshot while a reload swaps in new data.
#[test]
fn test_concurrent_queries_during_reload() {
    let first = (0..50).map(|id| {
        let x = id as f64;
        FeatureRecord::from_line(id, "stream", LineString::from(vec![(x, -1.0), (x, 1.0)]))
    });
    let shared = SharedDataset::new(load_dataset(first).expect("dataset"));
    let track = Arc::new(vec![c(-1.0, 0.0), c(100.0, 0.0)]);

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            let track = Arc::clone(&track);
            thread::spawn(move || {
                for _ in 0..200 {
                    let result = shared.query(&track).expect("query");
                    // either the old dataset (50 features) or the new one (80)
                    assert!(result.len() == 50 || result.len() == 80);
                    let ids = result.feature_ids();
                    let mut sorted = ids.clone();
                    sorted.sort_unstable();
                    assert_eq!(ids, sorted);
                }
            })
        })
        .collect();

    let second = (0..80).map(|id| {
        let x = id as f64;
        FeatureRecord::from_line(id, "stream", LineString::from(vec![(x, -1.0), (x, 1.0)]))
    });
    let stats = shared.reload(second).expect("reload");
    assert_eq!(stats.feature_count, 80);

    for reader in readers {
        reader.join().expect("reader thread");
    }

    assert_eq!(shared.generation(), 1);
    assert_eq!(shared.query(&track).expect("query").len(), 80);
}

/// A failed reload leaves the current dataset in place.
#[test]
fn test_failed_reload_keeps_current_dataset() {
    let shared = SharedDataset::new(
        load_dataset(vec![FeatureRecord::from_line(
            1,
            "river",
            LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]),
        )])
        .expect("dataset"),
    );
    let before = shared.snapshot();

    let err = shared.reload(Vec::new()).unwrap_err();
    assert!(matches!(err, WaterwayError::Dataset(_)));
    assert_eq!(shared.generation(), 0);
    assert!(Arc::ptr_eq(&before, &shared.snapshot()));
}

/// Batch queries keep input order and isolate failing tracks.
#[test]
fn test_query_batch_isolates_failures() {
    let dataset = load_dataset(vec![FeatureRecord::from_line(
        1,
        "river",
        LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]),
    )])
    .expect("dataset");

    let tracks = vec![
        vec![c(5.0, -1.0), c(5.0, 1.0)],
        vec![c(5.0, -1.0)],
        vec![c(20.0, -1.0), c(20.0, 1.0)],
    ];
    let results = dataset.query_batch(&tracks);

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().expect("first").feature_ids(), vec![1]);
    assert!(matches!(results[1], Err(WaterwayError::InvalidTrack(_))));
    assert!(results[2].as_ref().expect("third").is_empty());
}
