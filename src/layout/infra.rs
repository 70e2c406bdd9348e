// src/layout/infra.rs
//
// Column layout of the bank-wise ATM, acceptance infrastructure and card
// statistics sheet across its three historical epochs.

use super::epoch::Epoch;

pub const SERIAL_COLUMN: usize = 0;
pub const NAME_COLUMN: usize = 1;

/// Every logical value the infrastructure feed produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfraField {
    AtmsOnSite,
    AtmsOffSite,
    PosTerminals,
    MicroAtms,
    BharatQrCodes,
    UpiQrCodes,
    CreditCardsOutstanding,
    DebitCardsOutstanding,
    CreditPosVolume,
    CreditPosValue,
    CreditOnlineVolume,
    CreditOnlineValue,
    CreditOthersVolume,
    CreditOthersValue,
    CreditAtmCashVolume,
    CreditAtmCashValue,
    DebitPosVolume,
    DebitPosValue,
    DebitOnlineVolume,
    DebitOnlineValue,
    DebitOthersVolume,
    DebitOthersValue,
    DebitAtmCashVolume,
    DebitAtmCashValue,
    DebitPosCashVolume,
    DebitPosCashValue,
}

impl InfraField {
    /// Dotted output path, for diagnostics.
    pub fn path(&self) -> &'static str {
        use InfraField::*;
        match self {
            AtmsOnSite => "Infrastructure.ATMs_CRMs.OnSite",
            AtmsOffSite => "Infrastructure.ATMs_CRMs.OffSite",
            PosTerminals => "Infrastructure.PoS",
            MicroAtms => "Infrastructure.MicroATMs",
            BharatQrCodes => "Infrastructure.BharatQRCodes",
            UpiQrCodes => "Infrastructure.UPIQRCodes",
            CreditCardsOutstanding => "Infrastructure.CreditCards",
            DebitCardsOutstanding => "Infrastructure.DebitCards",
            CreditPosVolume => "CardPaymentsTransactions.CreditCards.PoS.Volume",
            CreditPosValue => "CardPaymentsTransactions.CreditCards.PoS.Value",
            CreditOnlineVolume => "CardPaymentsTransactions.CreditCards.OnlineEcom.Volume",
            CreditOnlineValue => "CardPaymentsTransactions.CreditCards.OnlineEcom.Value",
            CreditOthersVolume => "CardPaymentsTransactions.CreditCards.Others.Volume",
            CreditOthersValue => "CardPaymentsTransactions.CreditCards.Others.Value",
            CreditAtmCashVolume => "CardPaymentsTransactions.CreditCards.CashWithdrawalATM.Volume",
            CreditAtmCashValue => "CardPaymentsTransactions.CreditCards.CashWithdrawalATM.Value",
            DebitPosVolume => "CardPaymentsTransactions.DebitCards.PoS.Volume",
            DebitPosValue => "CardPaymentsTransactions.DebitCards.PoS.Value",
            DebitOnlineVolume => "CardPaymentsTransactions.DebitCards.OnlineEcom.Volume",
            DebitOnlineValue => "CardPaymentsTransactions.DebitCards.OnlineEcom.Value",
            DebitOthersVolume => "CardPaymentsTransactions.DebitCards.Others.Volume",
            DebitOthersValue => "CardPaymentsTransactions.DebitCards.Others.Value",
            DebitAtmCashVolume => "CardPaymentsTransactions.DebitCards.CashWithdrawalATM.Volume",
            DebitAtmCashValue => "CardPaymentsTransactions.DebitCards.CashWithdrawalATM.Value",
            DebitPosCashVolume => "CardPaymentsTransactions.DebitCards.CashWithdrawalPoS.Volume",
            DebitPosCashValue => "CardPaymentsTransactions.DebitCards.CashWithdrawalPoS.Value",
        }
    }
}

/// Where one logical field sits in each epoch. `None` means the source did
/// not collect the value yet; the mapper zero-fills it.
#[derive(Debug, Clone, Copy)]
pub struct FieldColumn {
    pub field: InfraField,
    pub current: usize,
    pub pre_2022_03: Option<usize>,
    pub pre_2020_05: Option<usize>,
}

impl FieldColumn {
    pub fn column(&self, epoch: Epoch) -> Option<usize> {
        match epoch {
            Epoch::Current => Some(self.current),
            Epoch::Pre2022_03 => self.pre_2022_03,
            Epoch::Pre2020_05 => self.pre_2020_05,
        }
    }
}

const fn col(
    field: InfraField,
    current: usize,
    pre_2022_03: Option<usize>,
    pre_2020_05: Option<usize>,
) -> FieldColumn {
    FieldColumn {
        field,
        current,
        pre_2022_03,
        pre_2020_05,
    }
}

// UPI QR codes and debit-card cash withdrawal at PoS arrive in 2022-03;
// online/e-com and "others" card splits arrive in 2020-05.
pub static INFRA_LAYOUT: &[FieldColumn] = &[
    col(InfraField::AtmsOnSite, 2, Some(2), Some(2)),
    col(InfraField::AtmsOffSite, 3, Some(3), Some(3)),
    col(InfraField::PosTerminals, 4, Some(4), Some(4)),
    col(InfraField::MicroAtms, 5, Some(5), Some(5)),
    col(InfraField::BharatQrCodes, 6, Some(6), Some(6)),
    col(InfraField::UpiQrCodes, 7, None, None),
    col(InfraField::CreditCardsOutstanding, 8, Some(7), Some(7)),
    col(InfraField::DebitCardsOutstanding, 9, Some(8), Some(8)),
    col(InfraField::CreditPosVolume, 10, Some(9), Some(9)),
    col(InfraField::CreditPosValue, 11, Some(10), Some(10)),
    col(InfraField::CreditOnlineVolume, 12, Some(11), None),
    col(InfraField::CreditOnlineValue, 13, Some(12), None),
    col(InfraField::CreditOthersVolume, 14, Some(13), None),
    col(InfraField::CreditOthersValue, 15, Some(14), None),
    col(InfraField::CreditAtmCashVolume, 16, Some(15), Some(11)),
    col(InfraField::CreditAtmCashValue, 17, Some(16), Some(12)),
    col(InfraField::DebitPosVolume, 18, Some(17), Some(13)),
    col(InfraField::DebitPosValue, 19, Some(18), Some(14)),
    col(InfraField::DebitOnlineVolume, 20, Some(19), None),
    col(InfraField::DebitOnlineValue, 21, Some(20), None),
    col(InfraField::DebitOthersVolume, 22, Some(21), None),
    col(InfraField::DebitOthersValue, 23, Some(22), None),
    col(InfraField::DebitAtmCashVolume, 24, Some(23), Some(15)),
    col(InfraField::DebitAtmCashValue, 25, Some(24), Some(16)),
    col(InfraField::DebitPosCashVolume, 26, None, None),
    col(InfraField::DebitPosCashValue, 27, None, None),
];

/// Narrowest row that still reaches a bank name and one value.
pub const MIN_COLUMNS: usize = NAME_COLUMN + 2;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn columns_are_unique_per_epoch() {
        for epoch in [Epoch::Current, Epoch::Pre2022_03, Epoch::Pre2020_05] {
            let cols: Vec<usize> = INFRA_LAYOUT.iter().filter_map(|f| f.column(epoch)).collect();
            let unique: HashSet<usize> = cols.iter().copied().collect();
            assert_eq!(cols.len(), unique.len(), "duplicate column in {}", epoch);
            assert!(cols.iter().all(|c| *c > NAME_COLUMN));
        }
    }

    #[test]
    fn fields_are_listed_once() {
        let fields: HashSet<InfraField> = INFRA_LAYOUT.iter().map(|f| f.field).collect();
        assert_eq!(fields.len(), INFRA_LAYOUT.len());
        assert_eq!(fields.len(), 26);
        let paths: HashSet<&str> = INFRA_LAYOUT.iter().map(|f| f.field.path()).collect();
        assert_eq!(paths.len(), 26);
    }
}
