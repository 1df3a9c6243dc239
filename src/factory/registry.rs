//! Token → pool registry.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::config::MarketConfig;
use crate::domain::{Address, Event};
use crate::error::AmmError;
use crate::pools::ExchangePool;

/// Creates pools and guarantees at most one pool per token.
///
/// Entries are append-only: once a token is bound to a pool the binding
/// never changes.  Pool addresses are derived from the registry's own
/// address and a creation counter, and every pool inherits the fee and
/// price scale of the [`MarketConfig`] the registry was built from.
///
/// # Example
///
/// ```rust
/// use native_amm::config::MarketConfig;
/// use native_amm::domain::Address;
/// use native_amm::error::AmmError;
/// use native_amm::factory::Registry;
///
/// let mut registry = Registry::new(&MarketConfig::default()).expect("valid config");
/// let token = Address::from_low_u64_be(0x70);
/// let mut events = Vec::new();
///
/// let pool = registry.create_pool(token, &mut events).expect("first pool");
/// assert_eq!(registry.lookup(&token), Some(pool));
/// assert_eq!(
///     registry.create_pool(token, &mut events),
///     Err(AmmError::AlreadyExistAnExchangeForThisToken)
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    address: Address,
    config: MarketConfig,
    pool_of: BTreeMap<Address, Address>,
    pools: BTreeMap<Address, ExchangePool>,
    nonce: u64,
}

impl Registry {
    /// Creates an empty registry.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `config` is invalid.
    pub fn new(config: &MarketConfig) -> Result<Self, AmmError> {
        config.validate()?;
        Ok(Self {
            address: config.registry_address,
            config: config.clone(),
            pool_of: BTreeMap::new(),
            pools: BTreeMap::new(),
            nonce: 0,
        })
    }

    /// Address pools are derived from.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Creates the pool for `token` and pushes `PoolCreated` to `events`.
    ///
    /// # Errors
    ///
    /// See [`create_pool_avoiding`](Self::create_pool_avoiding).
    pub fn create_pool(
        &mut self,
        token: Address,
        events: &mut Vec<Event>,
    ) -> Result<Address, AmmError> {
        self.create_pool_avoiding(token, |_| false, events)
    }

    /// Creates the pool for `token`, skipping derived addresses for which
    /// `in_use` returns `true`.
    ///
    /// The pool never lands on `token` itself or on an existing pool.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidTokenAddress`] if `token` is zero.
    /// - [`AmmError::AlreadyExistAnExchangeForThisToken`] if `token`
    ///   already has a pool.
    /// - [`AmmError::Overflow`] if the creation counter is exhausted.
    pub fn create_pool_avoiding(
        &mut self,
        token: Address,
        in_use: impl Fn(&Address) -> bool,
        events: &mut Vec<Event>,
    ) -> Result<Address, AmmError> {
        if token.is_zero() {
            return Err(AmmError::InvalidTokenAddress);
        }
        if self.pool_of.contains_key(&token) {
            return Err(AmmError::AlreadyExistAnExchangeForThisToken);
        }

        let mut nonce = self.nonce;
        let mut address = self.address.derive(nonce)?;
        while address == token || self.pools.contains_key(&address) || in_use(&address) {
            debug!(skipped = %address, "derived pool address in use");
            nonce = nonce
                .checked_add(1)
                .ok_or(AmmError::Overflow("pool nonce overflow"))?;
            address = self.address.derive(nonce)?;
        }
        let pool = ExchangePool::new(
            address,
            token,
            self.config.fee_tier,
            self.config.price_scale,
        )?;
        self.nonce = nonce + 1;
        self.pool_of.insert(token, address);
        self.pools.insert(address, pool);
        events.push(Event::PoolCreated {
            token,
            pool: address,
        });

        info!(token = %token, pool = %address, "pool created");
        Ok(address)
    }

    /// Pool address bound to `token`, if any.
    #[must_use]
    pub fn lookup(&self, token: &Address) -> Option<Address> {
        self.pool_of.get(token).copied()
    }

    /// Pool trading `token`, if any.
    #[must_use]
    pub fn pool(&self, token: &Address) -> Option<&ExchangePool> {
        self.lookup(token).and_then(|a| self.pools.get(&a))
    }

    /// Mutable pool trading `token`, if any.
    pub fn pool_mut(&mut self, token: &Address) -> Option<&mut ExchangePool> {
        let address = self.lookup(token)?;
        self.pools.get_mut(&address)
    }

    /// Pool living at `address`, if any.
    #[must_use]
    pub fn pool_by_address(&self, address: &Address) -> Option<&ExchangePool> {
        self.pools.get(address)
    }

    /// Returns `true` if `address` belongs to a pool.
    #[must_use]
    pub fn is_pool(&self, address: &Address) -> bool {
        self.pools.contains_key(address)
    }

    /// Number of registered pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pool_of.len()
    }

    /// Returns `true` if no pool has been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool_of.is_empty()
    }

    /// `(token, pool address)` pairs in token order.
    pub fn iter(&self) -> impl Iterator<Item = (Address, Address)> + '_ {
        self.pool_of.iter().map(|(t, p)| (*t, *p))
    }
}
