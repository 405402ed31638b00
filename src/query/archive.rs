//! Archive index: posts grouped by year, then month

use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::content::Post;

#[derive(Debug, Clone, Serialize)]
pub struct Archive {
    /// Newest year first
    pub years: Vec<ArchiveYear>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveYear {
    pub year: i32,
    pub count: usize,
    /// Newest month first
    pub months: Vec<ArchiveMonth>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveMonth {
    pub month: u32,
    /// English month name, e.g. "March"
    pub name: String,
    /// Newest first
    pub posts: Vec<ArchiveEntry>,
}

/// Listing data for one archived post
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub slug: String,
    pub title: String,
    pub path: String,
    /// Publication day, `YYYY-MM-DD`
    pub date: String,
}

impl ArchiveEntry {
    fn from_post(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            path: post.url_path(),
            date: post.effective_date().format("%Y-%m-%d").to_string(),
        }
    }
}

impl Archive {
    /// Group posts by `effective_date()`; every post lands in exactly one bucket
    pub fn build(posts: &[&Post]) -> Self {
        let mut buckets: BTreeMap<i32, BTreeMap<u32, Vec<&Post>>> = BTreeMap::new();

        for post in posts {
            let date = post.effective_date();
            buckets
                .entry(date.year())
                .or_default()
                .entry(date.month())
                .or_default()
                .push(*post);
        }

        let years = buckets
            .into_iter()
            .rev()
            .map(|(year, months)| {
                let months: Vec<ArchiveMonth> = months
                    .into_iter()
                    .rev()
                    .map(|(month, mut posts)| {
                        posts.sort_by(|a, b| {
                            b.effective_date()
                                .cmp(&a.effective_date())
                                .then_with(|| a.slug.cmp(&b.slug))
                        });
                        ArchiveMonth {
                            month,
                            name: month_name(month).to_string(),
                            posts: posts.iter().map(|p| ArchiveEntry::from_post(p)).collect(),
                        }
                    })
                    .collect();
                ArchiveYear {
                    year,
                    count: months.iter().map(|m| m.posts.len()).sum(),
                    months,
                }
            })
            .collect();

        Self { years }
    }

    /// Total number of posts across all buckets
    pub fn len(&self) -> usize {
        self.years.iter().map(|y| y.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}
