use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::models::galleries::GalleryId;
use silver_halide_records::PhotoRecord;

pub type PhotoId = String;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Photo {
    pub id: PhotoId,
    pub collection_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: String,
    pub gallery: Option<GalleryId>,
    pub featured: bool,
    pub order: Option<i64>,
}

impl From<PhotoRecord> for Photo {
    fn from(record: PhotoRecord) -> Self {
        let gallery = record.gallery_id().map(str::to_string);

        Photo {
            id: record.id,
            collection_id: record.collection_id,
            title: match record.title.as_str() {
                "" => None,
                title => Some(title.to_string()),
            },
            description: match record.description.as_str() {
                "" => None,
                description => Some(description.to_string()),
            },
            image: record.image,
            gallery,
            featured: record.featured,
            order: record.order,
        }
    }
}

/// Caps a bulk photo fetch at `cap` photos per contributing gallery.
///
/// Photos are partitioned by owning gallery; a photo whose gallery id is not
/// in `effective_ids` (orphans included) lands in the first id's bucket, which
/// is the queried root by construction. Each bucket is shuffled uniformly and
/// truncated to `cap`, then the buckets are concatenated in `effective_ids`
/// order. An empty id set yields an empty result.
///
/// The random source is passed in so callers that need reproducible output
/// can seed it.
pub fn sample_per_gallery<R: Rng>(
    photos: Vec<Photo>,
    effective_ids: &[GalleryId],
    cap: usize,
    rng: &mut R,
) -> Vec<Photo> {
    if effective_ids.is_empty() {
        return Vec::new();
    }

    let mut buckets: HashMap<usize, Vec<Photo>> = HashMap::new();
    for photo in photos {
        let bucket = photo
            .gallery
            .as_deref()
            .and_then(|owner| effective_ids.iter().position(|id| id == owner))
            .unwrap_or(0);
        buckets.entry(bucket).or_default().push(photo);
    }

    let mut sampled = Vec::new();
    for bucket in 0..effective_ids.len() {
        if let Some(mut group) = buckets.remove(&bucket) {
            group.shuffle(rng);
            group.truncate(cap);
            sampled.extend(group);
        }
    }

    sampled
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn photo(id: &str, gallery: &str) -> Photo {
        Photo {
            id: id.to_string(),
            collection_id: "col_photos".to_string(),
            image: format!("{}.jpg", id),
            gallery: match gallery {
                "" => None,
                gallery => Some(gallery.to_string()),
            },
            ..Default::default()
        }
    }

    fn ids(values: &[&str]) -> Vec<GalleryId> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn never_exceeds_cap_per_gallery() {
        let photos = vec![
            photo("1", "a"),
            photo("2", "a"),
            photo("3", "a"),
            photo("4", "b"),
            photo("5", "b"),
        ];
        let mut rng = StdRng::seed_from_u64(7);

        let sampled = sample_per_gallery(photos, &ids(&["a", "b"]), 2, &mut rng);

        assert_eq!(sampled.len(), 4);
        let from_a = sampled.iter().filter(|p| p.gallery.as_deref() == Some("a"));
        let from_b = sampled.iter().filter(|p| p.gallery.as_deref() == Some("b"));
        assert_eq!(from_a.count(), 2);
        assert_eq!(from_b.count(), 2);
    }

    #[test]
    fn never_returns_duplicate_ids() {
        let photos: Vec<_> = (0..20)
            .map(|n| photo(&n.to_string(), if n % 2 == 0 { "a" } else { "b" }))
            .collect();
        let mut rng = StdRng::seed_from_u64(11);

        let sampled = sample_per_gallery(photos, &ids(&["a", "b"]), 5, &mut rng);

        let unique: HashSet<_> = sampled.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(unique.len(), sampled.len());
    }

    #[test]
    fn generous_cap_preserves_membership() {
        let photos = vec![photo("1", "a"), photo("2", "a"), photo("3", "a")];
        let mut rng = StdRng::seed_from_u64(3);

        let sampled = sample_per_gallery(photos.clone(), &ids(&["a"]), 100, &mut rng);

        let expected: HashSet<_> = photos.iter().map(|p| p.id.clone()).collect();
        let got: HashSet<_> = sampled.iter().map(|p| p.id.clone()).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn one_per_gallery_scenario() {
        let photos = vec![photo("1", "a"), photo("2", "a"), photo("3", "b")];
        let mut rng = StdRng::seed_from_u64(1);

        let sampled = sample_per_gallery(photos, &ids(&["a", "b"]), 1, &mut rng);

        assert_eq!(sampled.len(), 2);
        assert!(matches!(sampled[0].id.as_str(), "1" | "2"));
        assert_eq!(sampled[0].gallery.as_deref(), Some("a"));
        assert_eq!(sampled[1].id, "3");
    }

    #[test]
    fn buckets_concatenate_in_enumeration_order() {
        let photos = vec![photo("b-photo", "b"), photo("a-photo", "a")];
        let mut rng = StdRng::seed_from_u64(5);

        let sampled = sample_per_gallery(photos, &ids(&["a", "b"]), 1, &mut rng);

        assert_eq!(sampled[0].id, "a-photo");
        assert_eq!(sampled[1].id, "b-photo");
    }

    #[test]
    fn orphans_fall_back_to_the_root_bucket() {
        let photos = vec![
            photo("orphan", ""),
            photo("stray", "not-in-set"),
            photo("rooted", "root"),
        ];
        let mut rng = StdRng::seed_from_u64(9);

        let sampled = sample_per_gallery(photos, &ids(&["root", "child"]), 3, &mut rng);

        assert_eq!(sampled.len(), 3);
        let got: HashSet<_> = sampled.iter().map(|p| p.id.as_str()).collect();
        assert!(got.contains("orphan") && got.contains("stray") && got.contains("rooted"));
    }

    #[test]
    fn empty_id_set_yields_empty_result() {
        let photos = vec![photo("1", "a")];
        let mut rng = StdRng::seed_from_u64(2);

        assert!(sample_per_gallery(photos, &[], 1, &mut rng).is_empty());
    }

    #[test]
    fn seeded_sampling_is_reproducible() {
        let photos: Vec<_> = (0..10).map(|n| photo(&n.to_string(), "a")).collect();

        let mut first_rng = StdRng::seed_from_u64(42);
        let first = sample_per_gallery(photos.clone(), &ids(&["a"]), 4, &mut first_rng);

        let mut second_rng = StdRng::seed_from_u64(42);
        let second = sample_per_gallery(photos, &ids(&["a"]), 4, &mut second_rng);

        assert_eq!(first, second);
    }
}
