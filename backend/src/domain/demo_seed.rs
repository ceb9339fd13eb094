//! Demo catalogue seeding.
//!
//! Inserts a fixed set of approved caches around the UC Santa Cruz campus for
//! a chosen author. Seeding is idempotent per cache name: caches the author
//! already owns under the same name are skipped.

use std::collections::HashSet;
use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::ports::{CacheRepository, ProfileRepository};
use crate::domain::service_errors::{map_cache_error, map_profile_error};
use crate::domain::{
    CacheDraft, CacheFilter, CacheStatus, Error, NewCache, RawCacheDraft, UserId,
};

struct DemoCache {
    name: &'static str,
    lat: f64,
    long: f64,
    description: &'static str,
    hint: &'static str,
    difficulty: i64,
    terrain: i64,
    size: i64,
}

const DEMO_CACHES: [DemoCache; 5] = [
    DemoCache {
        name: "Arboretum",
        lat: 36.98267070650899,
        long: -122.05985900885949,
        description: "The UCSC Arboretum is a beautiful part of campus full of various trees and \
                      wildlife. Even if you can't find the cache, come for the smells alone.",
        hint: "Check under this tree from down under!",
        difficulty: 4,
        terrain: 3,
        size: 2,
    },
    DemoCache {
        name: "Quarry Amphitheater",
        lat: 36.9986320770141,
        long: -122.05648938884585,
        description: "The Quarry Amphitheater is a great place to watch some great concerts. \
                      Check the UCSC website to see what shows are coming up!",
        hint: "I guarantee you've never seen a show like this B4",
        difficulty: 2,
        terrain: 1,
        size: 1,
    },
    DemoCache {
        name: "Jack Baskin",
        lat: 37.0005353033127,
        long: -122.06380507461215,
        description: "Jack Baskin is home to many of the engineering classes here at UCSC. The \
                      buildings are some of the most modern looking buildings on campus.",
        hint: "These buildings are the CORNERstone of the engineering classes.",
        difficulty: 3,
        terrain: 3,
        size: 2,
    },
    DemoCache {
        name: "Porter",
        lat: 36.99473025211556,
        long: -122.06554686691216,
        description: "Porter Quad is often considered the noisiest place on campus at 3am. With \
                      two tall towers full of party-loving students, how could it not be?",
        hint: "If you can't find it, break a leg and try again.",
        difficulty: 2,
        terrain: 1,
        size: 5,
    },
    DemoCache {
        name: "East Remote",
        lat: 36.9905608,
        long: -122.0525279,
        description: "If you're living off campus, this parking lot is your best friend. You can \
                      catch the bus here to the rest of your classes.",
        hint: "If you climb over me, you'll be partying with the cows!",
        difficulty: 5,
        terrain: 1,
        size: 3,
    },
];

/// Counts reported after a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    /// Caches inserted by this run.
    pub inserted: usize,
    /// Caches skipped because the author already owns one with that name.
    pub skipped: usize,
}

/// Seeds the demo catalogue.
pub struct DemoSeeder<C, P> {
    caches: Arc<C>,
    profiles: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<C, P> DemoSeeder<C, P>
where
    C: CacheRepository,
    P: ProfileRepository,
{
    /// Create a seeder over the given repositories.
    pub fn new(caches: Arc<C>, profiles: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            caches,
            profiles,
            clock,
        }
    }

    /// Insert the demo caches for `author` as approved caches.
    pub async fn seed(&self, author: UserId) -> Result<SeedReport, Error> {
        self.profiles
            .find_by_id(author)
            .await
            .map_err(map_profile_error)?
            .ok_or_else(|| Error::not_found(format!("user {author} not found")))?;

        let existing: HashSet<String> = self
            .caches
            .list(&CacheFilter::all().by_author(author))
            .await
            .map_err(map_cache_error)?
            .into_iter()
            .map(|cache| cache.name)
            .collect();

        let mut report = SeedReport::default();
        for demo in &DEMO_CACHES {
            if existing.contains(demo.name) {
                report.skipped += 1;
                continue;
            }
            let draft = CacheDraft::try_from(RawCacheDraft {
                name: demo.name.to_owned(),
                lat: demo.lat,
                long: demo.long,
                description: demo.description.to_owned(),
                hint: demo.hint.to_owned(),
                difficulty: demo.difficulty,
                terrain: demo.terrain,
                size: demo.size,
            })
            .map_err(|err| Error::internal(format!("invalid demo cache {}: {err}", demo.name)))?;
            let new = NewCache {
                draft,
                author,
                created_at: self.clock.utc(),
                status: CacheStatus::Approved,
            };
            self.caches.insert(&new).await.map_err(map_cache_error)?;
            report.inserted += 1;
        }

        info!(
            %author,
            inserted = report.inserted,
            skipped = report.skipped,
            "demo caches seeded"
        );
        Ok(report)
    }
}
