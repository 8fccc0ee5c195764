
use bloom::BloomFilter;
use config::BuildConfig;

pub(crate) fn sample_filter() -> BloomFilter {
    let elements: Vec<String> = (0..500).map(|i| format!("addr-{}", i)).collect();
    BloomFilter::create(&elements, 0.01, &BuildConfig::default()).unwrap()
}
