// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Racing deliveries must still produce exactly one artifact per subject.

mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use common::{init_tracing, photo_png, KEY_A, KEY_B};
use faceseal_core::{Coordinator, EnrollmentState, EnrollmentStore, MemoryStore, SubjectId};

const THREADS: usize = 8;

#[test]
fn simultaneous_completing_deliveries_build_once() {
    init_tracing();
    let coord = Coordinator::new(MemoryStore::new());
    let id = SubjectId::from("alice");
    coord.on_photo_captured(&id, &photo_png(48, 48, 1)).unwrap();

    let barrier = Barrier::new(THREADS);
    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                barrier.wait();
                coord.on_key_generated(&id, KEY_A).unwrap();
            });
        }
    });

    assert_eq!(coord.store().artifact_writes(), 1);
    let stats = coord.stats();
    assert_eq!(stats.started, 1);
    assert_eq!(stats.completed, 1);
    assert_eq!(coord.state(&id).unwrap(), EnrollmentState::Built { stale: false });
    assert!(coord.verify(&id).unwrap().verified);
}

#[test]
fn photo_and_key_racing_build_once() {
    let photo = photo_png(32, 32, 2);
    for round in 0..16 {
        let coord = Coordinator::new(MemoryStore::new());
        let id = SubjectId::new(format!("subject-{round}"));
        let barrier = Barrier::new(2);

        let (a, b) = thread::scope(|s| {
            let a = s.spawn(|| {
                barrier.wait();
                coord.on_photo_captured(&id, &photo).unwrap()
            });
            let b = s.spawn(|| {
                barrier.wait();
                coord.on_key_generated(&id, KEY_A).unwrap()
            });
            (a.join().unwrap(), b.join().unwrap())
        });

        // Exactly one of the two events performed the build.
        assert!(a.artifact.is_some() ^ b.artifact.is_some(), "round {round}");
        assert_eq!(coord.store().artifact_writes(), 1, "round {round}");
        assert!(coord.verify(&id).unwrap().verified, "round {round}");
    }
}

#[test]
fn coordinator_shared_through_arc() {
    let coord = Arc::new(Coordinator::new(Arc::new(MemoryStore::new())));
    let id = SubjectId::from("shared");
    coord.on_key_generated(&id, KEY_B).unwrap();

    let barrier = Arc::new(Barrier::new(THREADS));
    let photo = Arc::new(photo_png(32, 32, 3));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let (coord, barrier, photo, id) = (Arc::clone(&coord), Arc::clone(&barrier), Arc::clone(&photo), id.clone());
            thread::spawn(move || {
                barrier.wait();
                coord.on_photo_captured(&id, &photo).unwrap()
            })
        })
        .collect();
    let built = handles.into_iter().map(|h| h.join().unwrap()).filter(|r| r.artifact.is_some()).count();

    assert_eq!(built, 1);
    assert_eq!(coord.store().artifact_writes(), 1);
}

#[test]
fn independent_subjects_progress_in_parallel() {
    let coord = Coordinator::new(MemoryStore::new());
    let photo = photo_png(32, 32, 4);
    let subjects: Vec<_> = (0..32).map(|i| SubjectId::new(format!("user-{i:02}"))).collect();
    let barrier = Barrier::new(subjects.len() * 2);

    thread::scope(|s| {
        for id in &subjects {
            let (coord, photo, barrier) = (&coord, &photo, &barrier);
            s.spawn(move || {
                barrier.wait();
                coord.on_photo_captured(id, photo).unwrap();
            });
            s.spawn(move || {
                barrier.wait();
                coord.on_key_generated(id, KEY_A).unwrap();
            });
        }
    });

    assert_eq!(coord.store().artifact_writes(), subjects.len());
    let census = coord.census().unwrap();
    assert_eq!(census.complete, subjects);
}

#[test]
fn backfill_racing_events_builds_once() {
    let store = MemoryStore::new();
    let id = SubjectId::from("legacy");
    store.insert_record(id.clone(), Some(photo_png(32, 32, 5)), Some(KEY_A.to_string()));
    let coord = Coordinator::new(store);
    let barrier = Barrier::new(3);

    thread::scope(|s| {
        s.spawn(|| {
            barrier.wait();
            coord.backfill().unwrap();
        });
        s.spawn(|| {
            barrier.wait();
            coord.on_key_generated(&id, KEY_A).unwrap();
        });
        s.spawn(|| {
            barrier.wait();
            coord.backfill().unwrap();
        });
    });

    assert_eq!(coord.store().artifact_writes(), 1);
    assert!(coord.verify(&id).unwrap().verified);
}
