//! In-memory fungible ledger.

use std::collections::BTreeMap;

use crate::domain::{Address, Amount, Asset, Event};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;
use crate::traits::FungibleLedger;

/// Balances and allowances of one fungible asset.
///
/// Used for the native asset, for every deployed token and for each
/// pool's shares.  Minting is a transfer from the zero address and
/// burning a transfer to it; an allowance of [`Amount::MAX`] is treated
/// as unlimited and never decremented.
///
/// # Examples
///
/// ```
/// use native_amm::domain::{Address, Amount, Asset};
/// use native_amm::ledger::TokenLedger;
/// use native_amm::traits::FungibleLedger;
///
/// let alice = Address::from_low_u64_be(1);
/// let mut ledger = TokenLedger::new(Asset::Native, "Ether", "ETH");
/// ledger.mint(alice, Amount::from(5u64)).expect("mint");
/// assert_eq!(ledger.balance_of(&alice), Amount::from(5u64));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLedger {
    asset: Asset,
    name: String,
    symbol: String,
    balances: BTreeMap<Address, Amount>,
    allowances: BTreeMap<(Address, Address), Amount>,
    total_supply: Amount,
}

impl TokenLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new(asset: Asset, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            asset,
            name: name.into(),
            symbol: symbol.into(),
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            total_supply: Amount::ZERO,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ticker symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of accounts with a non-zero balance.
    #[must_use]
    pub fn holders(&self) -> usize {
        self.balances.len()
    }

    fn transfer_event(&self, from: Address, to: Address, amount: Amount) -> Event {
        Event::Transfer {
            asset: self.asset,
            from,
            to,
            amount,
        }
    }

    fn debit(&mut self, account: Address, amount: Amount) -> Result<(), AmmError> {
        let balance = self.balance_of(&account);
        let remaining = balance
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance)?;
        if remaining.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, remaining);
        }
        Ok(())
    }

    fn credit(&mut self, account: Address, amount: Amount) -> Result<(), AmmError> {
        if amount.is_zero() {
            return Ok(());
        }
        let balance = self.balance_of(&account).safe_add(&amount)?;
        self.balances.insert(account, balance);
        Ok(())
    }
}

impl FungibleLedger for TokenLedger {
    fn asset(&self) -> Asset {
        self.asset
    }

    fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn ensure_transfer(&self, from: &Address, amount: Amount) -> Result<(), AmmError> {
        if self.balance_of(from) < amount {
            return Err(AmmError::InsufficientBalance);
        }
        Ok(())
    }

    fn ensure_transfer_from(
        &self,
        owner: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        if self.allowance(owner, spender) < amount {
            return Err(AmmError::InsufficientAllowance);
        }
        self.ensure_transfer(owner, amount)
    }

    fn mint(&mut self, to: Address, amount: Amount) -> Result<Event, AmmError> {
        if to.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        let supply = self.total_supply.safe_add(&amount)?;
        self.credit(to, amount)?;
        self.total_supply = supply;
        Ok(self.transfer_event(Address::zero(), to, amount))
    }

    fn burn(&mut self, from: Address, amount: Amount) -> Result<Event, AmmError> {
        self.ensure_transfer(&from, amount)?;
        let supply = self.total_supply.safe_sub(&amount)?;
        self.debit(from, amount)?;
        self.total_supply = supply;
        Ok(self.transfer_event(from, Address::zero(), amount))
    }

    fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<Event, AmmError> {
        if to.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        self.ensure_transfer(&from, amount)?;
        // the credit can only overflow if total supply already did
        self.debit(from, amount)?;
        self.credit(to, amount)?;
        Ok(self.transfer_event(from, to, amount))
    }

    fn approve(
        &mut self,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<Event, AmmError> {
        if owner.is_zero() || spender.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        let Asset::Token(token) = self.asset else {
            return Err(AmmError::InvalidConfiguration(
                "the native asset has no allowances",
            ));
        };
        if amount.is_zero() {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
        Ok(Event::Approval {
            token,
            owner,
            spender,
            amount,
        })
    }

    fn increase_allowance(
        &mut self,
        owner: Address,
        spender: Address,
        added: Amount,
    ) -> Result<Event, AmmError> {
        let current = self.allowance(&owner, &spender);
        if current == Amount::MAX {
            return self.approve(owner, spender, current);
        }
        let raised = current.safe_add(&added)?;
        self.approve(owner, spender, raised)
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<Event, AmmError> {
        if to.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        self.ensure_transfer_from(&owner, &spender, amount)?;
        let allowance = self.allowance(&owner, &spender);
        if allowance != Amount::MAX {
            let remaining = allowance.safe_sub(&amount)?;
            if remaining.is_zero() {
                self.allowances.remove(&(owner, spender));
            } else {
                self.allowances.insert((owner, spender), remaining);
            }
        }
        self.transfer(owner, to, amount)
    }
}
