// src/record/infra.rs

use serde::Serialize;

use super::metric::Metric;
use crate::layout::InfraField;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SiteSplit {
    #[serde(rename = "OnSite")]
    pub on_site: Metric,
    #[serde(rename = "OffSite")]
    pub off_site: Metric,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Infrastructure {
    #[serde(rename = "ATMs_CRMs")]
    pub atms_crms: SiteSplit,
    #[serde(rename = "PoS")]
    pub pos: Metric,
    #[serde(rename = "MicroATMs")]
    pub micro_atms: Metric,
    #[serde(rename = "BharatQRCodes")]
    pub bharat_qr_codes: Metric,
    #[serde(rename = "UPIQRCodes")]
    pub upi_qr_codes: Metric,
    #[serde(rename = "CreditCards")]
    pub credit_cards: Metric,
    #[serde(rename = "DebitCards")]
    pub debit_cards: Metric,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VolumeValue {
    #[serde(rename = "Volume")]
    pub volume: Metric,
    #[serde(rename = "Value")]
    pub value: Metric,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreditCardTransactions {
    #[serde(rename = "PoS")]
    pub pos: VolumeValue,
    #[serde(rename = "OnlineEcom")]
    pub online_ecom: VolumeValue,
    #[serde(rename = "Others")]
    pub others: VolumeValue,
    #[serde(rename = "CashWithdrawalATM")]
    pub cash_withdrawal_atm: VolumeValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DebitCardTransactions {
    #[serde(rename = "PoS")]
    pub pos: VolumeValue,
    #[serde(rename = "OnlineEcom")]
    pub online_ecom: VolumeValue,
    #[serde(rename = "Others")]
    pub others: VolumeValue,
    #[serde(rename = "CashWithdrawalATM")]
    pub cash_withdrawal_atm: VolumeValue,
    #[serde(rename = "CashWithdrawalPoS")]
    pub cash_withdrawal_pos: VolumeValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CardPaymentsTransactions {
    #[serde(rename = "CreditCards")]
    pub credit_cards: CreditCardTransactions,
    #[serde(rename = "DebitCards")]
    pub debit_cards: DebitCardTransactions,
}

/// Everything the infrastructure feed reports for one bank (or the total row).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InfraMetrics {
    #[serde(rename = "Infrastructure")]
    pub infrastructure: Infrastructure,
    #[serde(rename = "CardPaymentsTransactions")]
    pub card_payments: CardPaymentsTransactions,
}

// one field → slot table, expanded for shared and mutable access
macro_rules! field_slot {
    ($metrics:expr, $field:expr, $($mutability:tt)*) => {{
        use InfraField::*;
        let infra = & $($mutability)* $metrics.infrastructure;
        let credit = & $($mutability)* $metrics.card_payments.credit_cards;
        let debit = & $($mutability)* $metrics.card_payments.debit_cards;
        match $field {
            AtmsOnSite => & $($mutability)* infra.atms_crms.on_site,
            AtmsOffSite => & $($mutability)* infra.atms_crms.off_site,
            PosTerminals => & $($mutability)* infra.pos,
            MicroAtms => & $($mutability)* infra.micro_atms,
            BharatQrCodes => & $($mutability)* infra.bharat_qr_codes,
            UpiQrCodes => & $($mutability)* infra.upi_qr_codes,
            CreditCardsOutstanding => & $($mutability)* infra.credit_cards,
            DebitCardsOutstanding => & $($mutability)* infra.debit_cards,
            CreditPosVolume => & $($mutability)* credit.pos.volume,
            CreditPosValue => & $($mutability)* credit.pos.value,
            CreditOnlineVolume => & $($mutability)* credit.online_ecom.volume,
            CreditOnlineValue => & $($mutability)* credit.online_ecom.value,
            CreditOthersVolume => & $($mutability)* credit.others.volume,
            CreditOthersValue => & $($mutability)* credit.others.value,
            CreditAtmCashVolume => & $($mutability)* credit.cash_withdrawal_atm.volume,
            CreditAtmCashValue => & $($mutability)* credit.cash_withdrawal_atm.value,
            DebitPosVolume => & $($mutability)* debit.pos.volume,
            DebitPosValue => & $($mutability)* debit.pos.value,
            DebitOnlineVolume => & $($mutability)* debit.online_ecom.volume,
            DebitOnlineValue => & $($mutability)* debit.online_ecom.value,
            DebitOthersVolume => & $($mutability)* debit.others.volume,
            DebitOthersValue => & $($mutability)* debit.others.value,
            DebitAtmCashVolume => & $($mutability)* debit.cash_withdrawal_atm.volume,
            DebitAtmCashValue => & $($mutability)* debit.cash_withdrawal_atm.value,
            DebitPosCashVolume => & $($mutability)* debit.cash_withdrawal_pos.volume,
            DebitPosCashValue => & $($mutability)* debit.cash_withdrawal_pos.value,
        }
    }};
}

impl InfraMetrics {
    pub fn slot_mut(&mut self, field: InfraField) -> &mut Metric {
        field_slot!(self, field, mut)
    }

    pub fn get(&self, field: InfraField) -> &Metric {
        field_slot!(self, field,)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::INFRA_LAYOUT;

    #[test]
    fn every_field_has_its_own_slot() {
        let mut metrics = InfraMetrics::default();
        for (i, fc) in INFRA_LAYOUT.iter().enumerate() {
            *metrics.slot_mut(fc.field) = Metric::Number(i as f64 + 1.0);
        }
        for (i, fc) in INFRA_LAYOUT.iter().enumerate() {
            assert_eq!(metrics.get(fc.field), &Metric::Number(i as f64 + 1.0), "{}", fc.field.path());
        }
    }

    #[test]
    fn slot_matches_serialized_path() {
        let mut metrics = InfraMetrics::default();
        *metrics.slot_mut(InfraField::DebitPosCashValue) = Metric::Number(7.0);
        *metrics.slot_mut(InfraField::AtmsOffSite) = Metric::Number(3.0);
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(
            json["CardPaymentsTransactions"]["DebitCards"]["CashWithdrawalPoS"]["Value"],
            7
        );
        assert_eq!(json["Infrastructure"]["ATMs_CRMs"]["OffSite"], 3);
        assert_eq!(json["Infrastructure"]["UPIQRCodes"], 0);
    }
}
