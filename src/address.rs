use crate::config::CacheConfig;

/// An address split into its `| tag | set index | block offset |` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedAddress {
    pub tag: u64,
    pub set_index: usize,
    pub block_offset: u64,
}

impl CacheConfig {
    pub fn decode(&self, address: u64) -> DecodedAddress {
        let offset_width = self.block_bits();
        let set_index_width = self.set_bits();

        let block_offset = address & !(!0u64 << offset_width);
        let set_index_mask = !(!0u64 << set_index_width);
        let set_index = (address >> offset_width) & set_index_mask;
        let tag = address >> (set_index_width + offset_width);

        DecodedAddress {
            tag,
            // masked to `set_bits`, which `CacheConfig::new` checked against usize
            set_index: set_index as usize,
            block_offset,
        }
    }
}
