use crate::model::Group;
use fxhash::FxHashMap;
use tatekae_domain::MemberId;

/// Resolves member ids to display names for summaries.
pub trait MemberDirectory: Send + Sync {
    fn display_name(&self, member_id: &MemberId) -> Option<&str>;
}

impl MemberDirectory for FxHashMap<MemberId, String> {
    fn display_name(&self, member_id: &MemberId) -> Option<&str> {
        self.get(member_id).map(String::as_str)
    }
}

impl MemberDirectory for Group {
    fn display_name(&self, member_id: &MemberId) -> Option<&str> {
        self.member(member_id).map(|member| member.name.as_str())
    }
}
